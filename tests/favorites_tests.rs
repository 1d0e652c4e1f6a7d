mod common;

use std::sync::Arc;

use common::{actor, sample_listing, test_db};
use pet_catalog::catalog::FavoriteManager;
use pet_catalog::storage::Database;

fn manager() -> (tempfile::TempDir, Arc<Database>, FavoriteManager) {
    let (dir, db) = test_db();
    let db = Arc::new(db);
    let favorites = FavoriteManager::new(db.clone(), db.clone());
    (dir, db, favorites)
}

#[tokio::test]
async fn test_toggle_twice_restores_state() {
    let (_dir, db, favorites) = manager();
    db.insert_listing(&sample_listing("fav1000000000000", "Rex", "Dogs", "owner"))
        .unwrap();
    let viewer = actor("viewer");

    assert!(!favorites.is_favorite("viewer", "fav1000000000000").await.unwrap());
    assert!(favorites
        .toggle_favorite(&viewer, "fav1000000000000")
        .await
        .unwrap());
    assert!(favorites.is_favorite("viewer", "fav1000000000000").await.unwrap());
    assert!(!favorites
        .toggle_favorite(&viewer, "fav1000000000000")
        .await
        .unwrap());
    assert!(!favorites.is_favorite("viewer", "fav1000000000000").await.unwrap());
}

#[tokio::test]
async fn test_toggle_unknown_listing_is_allowed() {
    let (_dir, _db, favorites) = manager();
    let viewer = actor("viewer");

    assert!(favorites
        .toggle_favorite(&viewer, "nosuchlisting000")
        .await
        .unwrap());
    assert_eq!(
        favorites.favorite_ids("viewer").await.unwrap(),
        vec!["nosuchlisting000"]
    );
}

#[tokio::test]
async fn test_marks_are_isolated_per_actor() {
    let (_dir, _db, favorites) = manager();

    favorites
        .toggle_favorite(&actor("alice"), "shared0000000000")
        .await
        .unwrap();

    assert!(favorites.is_favorite("alice", "shared0000000000").await.unwrap());
    assert!(!favorites.is_favorite("bob", "shared0000000000").await.unwrap());

    // Bob marking the same listing does not affect Alice
    favorites
        .toggle_favorite(&actor("bob"), "shared0000000000")
        .await
        .unwrap();
    favorites
        .toggle_favorite(&actor("bob"), "shared0000000000")
        .await
        .unwrap();
    assert!(favorites.is_favorite("alice", "shared0000000000").await.unwrap());
}

#[tokio::test]
async fn test_favorite_listings_skip_missing() {
    let (_dir, db, favorites) = manager();
    db.insert_listing(&sample_listing("favA000000000000", "Rex", "Dogs", "owner"))
        .unwrap();
    db.insert_listing(&sample_listing("favB000000000000", "Tom", "Cats", "owner"))
        .unwrap();
    let viewer = actor("viewer");

    for id in ["favB000000000000", "gone000000000000", "favA000000000000"] {
        favorites.toggle_favorite(&viewer, id).await.unwrap();
    }

    let listings = favorites.favorite_listings(&viewer).await.unwrap();
    let names: Vec<&str> = listings.iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["Tom", "Rex"]);

    // The dangling mark is kept
    assert_eq!(favorites.favorite_ids("viewer").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_concurrent_toggles_by_different_actors() {
    let (_dir, _db, favorites) = manager();

    let mut handles = Vec::new();
    for i in 0..8 {
        let favorites = favorites.clone();
        handles.push(tokio::spawn(async move {
            let viewer = actor(&format!("actor-{i}"));
            favorites
                .toggle_favorite(&viewer, "popular000000000")
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    for i in 0..8 {
        assert!(favorites
            .is_favorite(&format!("actor-{i}"), "popular000000000")
            .await
            .unwrap());
    }
}
