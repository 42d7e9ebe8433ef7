use billed_core::{BillId, BillRecord};

use crate::error::StoreError;
use crate::store::{RequestHeaders, Store, UploadFile, UploadPayload};

fn receipt(name: &str) -> UploadPayload {
    UploadPayload::new(
        UploadFile::new(name, b"\x89PNG\r\n\x1a\n".to_vec()).with_content_type("image/png"),
    )
    .field("email", "conformance@test.tld")
}

fn submitted(name: &str, date: &str) -> String {
    serde_json::json!({
        "email": "conformance@test.tld",
        "type": "Transports",
        "name": name,
        "amount": 42,
        "date": date,
        "vat": "20",
        "pct": 20,
        "commentary": "",
        "fileUrl": "/public/receipt.png",
        "fileName": "receipt.png",
        "status": "pending"
    })
    .to_string()
}

/// Run the full bill store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if a store call fails unexpectedly.
pub async fn run_store_conformance_tests(store: &dyn Store) -> Result<(), StoreError> {
    test_create_returns_key_and_path(store).await?;
    test_create_allocates_distinct_keys(store).await?;
    test_update_then_list(store).await?;
    test_update_unknown_selector(store).await?;
    test_update_without_selector(store).await?;
    Ok(())
}

async fn test_create_returns_key_and_path(store: &dyn Store) -> Result<(), StoreError> {
    let created = store
        .bills()
        .create(receipt("receipt.png"), RequestHeaders::raw_body())
        .await?;
    assert!(!created.key.is_empty(), "create should assign a key");
    assert!(
        !created.file_path.is_empty(),
        "create should return the stored file path"
    );
    Ok(())
}

async fn test_create_allocates_distinct_keys(store: &dyn Store) -> Result<(), StoreError> {
    let first = store
        .bills()
        .create(receipt("a.jpg"), RequestHeaders::raw_body())
        .await?;
    let second = store
        .bills()
        .create(receipt("b.jpg"), RequestHeaders::raw_body())
        .await?;
    assert_ne!(first.key, second.key, "each upload should get its own key");
    Ok(())
}

async fn test_update_then_list(store: &dyn Store) -> Result<(), StoreError> {
    let created = store
        .bills()
        .create(receipt("receipt.png"), RequestHeaders::raw_body())
        .await?;
    store
        .bills()
        .update(submitted("conformance taxi", "2023-05-10"), Some(&created.key))
        .await?;

    let bills = store.bills().list().await?;
    let bill: &BillRecord = bills
        .iter()
        .find(|b| b.id.as_ref() == Some(&created.key))
        .expect("updated bill should be listed under its key");
    assert_eq!(bill.name, "conformance taxi");
    assert_eq!(bill.date, "2023-05-10");
    assert_eq!(bill.amount, Some(42));
    assert_eq!(bill.status, "pending");
    Ok(())
}

async fn test_update_unknown_selector(store: &dyn Store) -> Result<(), StoreError> {
    let missing = BillId::new("conformance-missing-key");
    let result = store
        .bills()
        .update(submitted("ghost", "2023-05-10"), Some(&missing))
        .await;
    assert!(
        result.is_err(),
        "update on an unknown key should be rejected"
    );
    Ok(())
}

async fn test_update_without_selector(store: &dyn Store) -> Result<(), StoreError> {
    let result = store
        .bills()
        .update(submitted("orphan", "2023-05-10"), None)
        .await;
    assert!(result.is_err(), "update without a key should be rejected");
    Ok(())
}
