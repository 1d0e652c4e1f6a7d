//! Fixtures and store doubles shared by the integration tests.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use pet_catalog::catalog::{Actor, IdGenerator, ListingDraft, Photo};
use pet_catalog::object_store::{ObjectStore, ObjectStoreError};
use pet_catalog::storage::models::{Category, Listing};
use pet_catalog::storage::{CatalogError, CatalogStore, Database, FavoriteStore};

pub fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, db)
}

pub fn actor(id: &str) -> Actor {
    Actor::new(id)
        .unwrap()
        .with_display_name("Ada Lovelace")
        .with_email("ada@example.com")
        .with_image_url("https://img.example.com/ada.png")
}

pub fn draft(fields: &[(&str, &str)]) -> ListingDraft {
    let mut draft = ListingDraft::default();
    for (field, value) in fields {
        assert!(draft.set(field, value.to_string()), "unknown field {field}");
    }
    draft
}

pub const REX: [(&str, &str); 8] = [
    ("name", "Rex"),
    ("breed", "Labrador"),
    ("age", "3"),
    ("weight", "28"),
    ("address", "Istanbul"),
    ("about", "Friendly"),
    ("category", "Dogs"),
    ("sex", "Male"),
];

pub fn rex() -> ListingDraft {
    draft(&REX)
}

pub fn without(field: &str) -> ListingDraft {
    let fields: Vec<(&str, &str)> = REX.iter().copied().filter(|(k, _)| *k != field).collect();
    draft(&fields)
}

pub fn png_bytes() -> Vec<u8> {
    let mut png = Vec::new();
    image::RgbImage::new(4, 4)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    png
}

/// A 64x64 PNG cut to half its length: the header is intact, the pixel data is not.
pub fn truncated_png() -> Vec<u8> {
    let mut png = Vec::new();
    image::RgbImage::from_fn(64, 64, |x, y| {
        image::Rgb([(x * 4) as u8, (y * 4) as u8, (x ^ y) as u8])
    })
    .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
    .unwrap();
    png.truncate(png.len() / 2);
    png
}

pub fn png_photo() -> Photo {
    Photo::new(Some("rex.png".to_string()), png_bytes())
}

/// A stored-ready listing built through the normal validation path.
pub fn sample_listing(external_id: &str, name: &str, category: &str, owner_id: &str) -> Listing {
    let mut fields = REX.to_vec();
    fields.retain(|(k, _)| *k != "name" && *k != "category");
    fields.push(("name", name));
    fields.push(("category", category));

    Listing::publish(
        draft(&fields).validate_fields().unwrap(),
        external_id.to_string(),
        format!("https://photos.test/{external_id}.png"),
        &actor(owner_id),
        Utc::now(),
    )
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
    }
}

// ============================================================================
// Object store doubles
// ============================================================================

/// In-memory photo store that records every put.
#[derive(Default)]
pub struct RecordingObjectStore {
    pub puts: Mutex<Vec<(String, Bytes, String)>>,
    pub fail: AtomicBool,
    pub blank_address: AtomicBool,
}

impl RecordingObjectStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    /// Accepts every put but hands back an empty address.
    pub fn blank_addresses() -> Self {
        let store = Self::default();
        store.blank_address.store(true, Ordering::SeqCst);
        store
    }

    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ObjectStoreError::Backend("bucket unavailable".to_string()));
        }
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), data, content_type.to_string()));
        if self.blank_address.load(Ordering::SeqCst) {
            return Ok(String::new());
        }
        Ok(format!("https://photos.test/{key}"))
    }

    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        self.puts
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, data, _)| data.clone())
            .ok_or_else(|| ObjectStoreError::NotFound(key.to_string()))
    }
}

// ============================================================================
// Catalog store doubles
// ============================================================================

/// Wraps the redb catalog, counting inserts and optionally failing them.
pub struct CountingCatalog {
    pub inner: Database,
    pub inserts: AtomicUsize,
    pub fail_inserts: AtomicBool,
}

impl CountingCatalog {
    pub fn new(inner: Database) -> Self {
        Self {
            inner,
            inserts: AtomicUsize::new(0),
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for CountingCatalog {
    async fn insert_listing(&self, listing: &Listing) -> Result<(), CatalogError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(CatalogError::Backend("write quota exceeded".to_string()));
        }
        self.inserts.fetch_add(1, Ordering::SeqCst);
        CatalogStore::insert_listing(&self.inner, listing).await
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Vec<Listing>, CatalogError> {
        self.inner.find_by_external_id(external_id).await
    }

    async fn scan_by_category(&self, category: &str) -> Result<Vec<Listing>, CatalogError> {
        self.inner.scan_by_category(category).await
    }

    async fn scan_by_category_page(
        &self,
        category: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Listing>, usize), CatalogError> {
        self.inner
            .scan_by_category_page(category, offset, limit)
            .await
    }

    async fn scan_by_owner(&self, owner_id: &str) -> Result<Vec<Listing>, CatalogError> {
        self.inner.scan_by_owner(owner_id).await
    }

    async fn scan_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.inner.scan_categories().await
    }
}

#[async_trait]
impl FavoriteStore for CountingCatalog {
    async fn is_favorite(&self, actor_id: &str, listing_id: &str) -> Result<bool, CatalogError> {
        FavoriteStore::is_favorite(&self.inner, actor_id, listing_id).await
    }

    async fn toggle_favorite(&self, actor_id: &str, listing_id: &str) -> Result<bool, CatalogError> {
        FavoriteStore::toggle_favorite(&self.inner, actor_id, listing_id).await
    }

    async fn favorites_of(&self, actor_id: &str) -> Result<Vec<String>, CatalogError> {
        self.inner.favorites_of(actor_id).await
    }
}

/// Hands out a fixed sequence of ids, repeating the last one.
pub struct ScriptedIds {
    ids: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedIds {
    pub fn new(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            ids: ids.iter().map(|s| s.to_string()).collect(),
            next: AtomicUsize::new(0),
        })
    }
}

impl IdGenerator for ScriptedIds {
    fn generate(&self) -> String {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.ids[i.min(self.ids.len() - 1)].clone()
    }
}
