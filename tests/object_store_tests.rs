use bytes::Bytes;
use pet_catalog::object_store::{LocalStore, ObjectStore, ObjectStoreError};

const BASE_URL: &str = "http://pets.test";

#[tokio::test]
async fn test_local_store_put_returns_address() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();

    let address = store
        .put("rex.png", Bytes::from("png bytes"), "image/png")
        .await
        .unwrap();
    assert_eq!(address, "http://pets.test/photos/rex.png");
}

#[tokio::test]
async fn test_local_store_trims_trailing_slash_from_base_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), "http://pets.test/").unwrap();

    let address = store
        .put("a.png", Bytes::from("data"), "image/png")
        .await
        .unwrap();
    assert_eq!(address, "http://pets.test/photos/a.png");
}

#[tokio::test]
async fn test_local_store_put_get() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();

    let data = Bytes::from("hello world");
    store.put("test-key", data.clone(), "image/png").await.unwrap();

    let retrieved = store.get("test-key").await.unwrap();
    assert_eq!(retrieved, data);
}

#[tokio::test]
async fn test_local_store_nested_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();

    let key = "listings/1700000000000_rex.png";
    store.put(key, Bytes::from("data"), "image/png").await.unwrap();

    assert!(dir.path().join("listings").is_dir());
    assert_eq!(store.get(key).await.unwrap(), Bytes::from("data"));
}

#[tokio::test]
async fn test_local_store_directory_is_not_an_object() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();

    store
        .put("listings/rex.png", Bytes::from("data"), "image/png")
        .await
        .unwrap();
    assert!(matches!(
        store.get("listings").await,
        Err(ObjectStoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_local_store_get_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();

    let result = store.get("missing").await;
    assert!(matches!(result, Err(ObjectStoreError::NotFound(_))));
}

#[tokio::test]
async fn test_local_store_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("photos"), BASE_URL).unwrap();
    std::fs::write(dir.path().join("secret.txt"), "secret").unwrap();

    assert!(matches!(
        store.get("../secret.txt").await,
        Err(ObjectStoreError::NotFound(_))
    ));
    assert!(store
        .put("/etc/evil.png", Bytes::from("x"), "image/png")
        .await
        .is_err());
}

#[tokio::test]
async fn test_local_store_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), BASE_URL).unwrap();

    store.put("key", Bytes::from("first"), "image/png").await.unwrap();
    store.put("key", Bytes::from("second"), "image/png").await.unwrap();

    let data = store.get("key").await.unwrap();
    assert_eq!(data, Bytes::from("second"));
}
