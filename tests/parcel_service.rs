use anyhow::Result;
use parcel_tracker::{Error, ParcelService, ParcelStatus, ParcelStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn create_service() -> Result<ParcelService> {
    init_tracing();
    Ok(ParcelService::new(ParcelStore::open_in_memory()?))
}

#[tokio::test]
async fn test_parcel_lifecycle() {
    test_parcel_lifecycle_impl().unwrap();
}

fn test_parcel_lifecycle_impl() -> Result<()> {
    let service = create_service()?;
    let parcel = service.register(1000, "Pushkin st. 1")?;
    assert!(parcel.number > 0);
    assert_eq!(parcel.status, "registered");
    assert_eq!(service.store().get(parcel.number)?, parcel);

    assert_eq!(service.next_status(parcel.number)?, ParcelStatus::Sent);
    assert_eq!(service.next_status(parcel.number)?, ParcelStatus::Delivered);
    assert_eq!(service.store().get(parcel.number)?.status, "delivered");

    let err = service.next_status(parcel.number).unwrap_err();
    assert!(matches!(err, Error::FinalStatus(n) if n == parcel.number));
    Ok(())
}

#[tokio::test]
async fn test_change_address_only_while_registered() {
    test_change_address_only_while_registered_impl().unwrap();
}

fn test_change_address_only_while_registered_impl() -> Result<()> {
    let service = create_service()?;
    let parcel = service.register(7, "old")?;

    service.change_address(parcel.number, "new")?;
    assert_eq!(service.store().get(parcel.number)?.address, "new");

    service.next_status(parcel.number)?;
    let err = service.change_address(parcel.number, "newer").unwrap_err();
    assert!(matches!(
        err,
        Error::NotRegistered { number, ref status } if number == parcel.number && status == "sent"
    ));
    assert_eq!(service.store().get(parcel.number)?.address, "new");
    Ok(())
}

#[tokio::test]
async fn test_delete_only_while_registered() {
    test_delete_only_while_registered_impl().unwrap();
}

fn test_delete_only_while_registered_impl() -> Result<()> {
    let service = create_service()?;
    let kept = service.register(7, "a")?;
    let removed = service.register(7, "b")?;

    service.next_status(kept.number)?;
    assert!(matches!(
        service.delete(kept.number),
        Err(Error::NotRegistered { .. })
    ));

    service.delete(removed.number)?;
    assert!(service.store().get(removed.number).unwrap_err().is_not_found());

    let remaining = service.parcels_of(7)?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].number, kept.number);
    Ok(())
}
