//! Parcel lifecycle rules on top of [`ParcelStore`].
//!
//! A parcel moves `registered -> sent -> delivered`. Its address may be
//! changed, and the parcel deleted, only while it is still registered.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::parcel::{Parcel, ParcelStatus};
use crate::store::ParcelStore;

/// Parcel operations that enforce the status lifecycle.
pub struct ParcelService {
    store: ParcelStore,
}

impl ParcelService {
    /// Build a service over an opened store.
    pub fn new(store: ParcelStore) -> Self {
        Self { store }
    }

    /// The underlying store, for reads and unchecked writes.
    pub fn store(&self) -> &ParcelStore {
        &self.store
    }

    /// Register a new parcel for `client` and return it with its number.
    pub fn register(&self, client: i64, address: &str) -> Result<Parcel> {
        let mut parcel = Parcel::new(client, address);
        parcel.number = self.store.add(&parcel)?;
        info!(
            number = parcel.number,
            client,
            address,
            created_at = %parcel.created_at,
            "parcel registered"
        );
        Ok(parcel)
    }

    /// All parcels of `client`.
    pub fn parcels_of(&self, client: i64) -> Result<Vec<Parcel>> {
        self.store.get_by_client(client)
    }

    /// Advance the parcel to its next status and return the new one.
    pub fn next_status(&self, number: i64) -> Result<ParcelStatus> {
        let parcel = self.store.get(number)?;
        let current: ParcelStatus = parcel.status.parse()?;
        let next = current.next().ok_or(Error::FinalStatus(number))?;
        self.store.set_status(number, next.as_str())?;
        info!(number, from = %current, to = %next, "parcel status changed");
        Ok(next)
    }

    /// Change the address of a parcel that is still registered.
    pub fn change_address(&self, number: i64, address: &str) -> Result<()> {
        self.ensure_registered(number)?;
        self.store.set_address(number, address)?;
        info!(number, address, "parcel address changed");
        Ok(())
    }

    /// Delete a parcel that is still registered.
    pub fn delete(&self, number: i64) -> Result<()> {
        self.ensure_registered(number)?;
        self.store.delete(number)?;
        info!(number, "parcel deleted");
        Ok(())
    }

    fn ensure_registered(&self, number: i64) -> Result<()> {
        let parcel = self.store.get(number)?;
        if parcel.status != ParcelStatus::Registered.as_str() {
            warn!(number, status = %parcel.status, "parcel is no longer registered");
            return Err(Error::NotRegistered {
                number,
                status: parcel.status,
            });
        }
        Ok(())
    }
}
