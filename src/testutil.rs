//! Shared test helpers for in-crate router tests.

use std::io::Cursor;
use std::sync::Arc;

use crate::config::{Config, NodeConfig, StorageConfig};
use crate::object_store::LocalStore;
use crate::storage::Database;
use crate::AppState;

pub const TEST_BASE_URL: &str = "http://pets.test";

/// Create a test AppState with a temporary database and local photo store.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");
    let photos_dir = temp_dir.path().join("photos");

    let config = Config {
        node: NodeConfig {
            bind_address: "127.0.0.1:0".to_string(),
            data_dir: data_dir.to_string_lossy().to_string(),
            public_base_url: TEST_BASE_URL.to_string(),
        },
        storage: StorageConfig {
            local_storage_path: photos_dir.to_string_lossy().to_string(),
            ..Default::default()
        },
        seed_categories: Vec::new(),
        test_mode: true,
        max_upload_size: 1024 * 1024, // 1MB for tests
    };

    let db = Database::open(&data_dir).expect("Failed to open test database");
    let object_store =
        LocalStore::new(&photos_dir, TEST_BASE_URL).expect("Failed to create test photo store");

    Arc::new(AppState::new(config, db, Arc::new(object_store)))
}

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut png = Vec::new();
    image::RgbImage::new(4, 4)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("Failed to encode test PNG");
    png
}
