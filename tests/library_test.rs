//! Saved products and brand profiles follow the same lean/hydrate rules as
//! projects, over their single file field.

mod helpers;

use genieus_store::{BrandProfile, MediaStore, SavedProduct};
use helpers::{at, image, setup_in_memory};

fn product(id: &str, user_id: &str, minute: u32, image_bytes: Option<&[u8]>) -> SavedProduct {
    SavedProduct {
        id: id.to_string(),
        user_id: user_id.to_string(),
        created_at: at(minute),
        name: format!("Product {}", id),
        image: image_bytes.map(|bytes| image(&format!("{}-img", id), bytes)),
        metadata: Default::default(),
    }
}

fn brand_profile(user_id: &str, logo: &[u8]) -> BrandProfile {
    let mut profile = BrandProfile {
        user_id: user_id.to_string(),
        updated_at: at(0),
        logo: Some(image(&format!("{}-logo", user_id), logo)),
        metadata: Default::default(),
    };
    profile
        .metadata
        .insert("brandColors".to_string(), serde_json::json!(["#ff0000", "#000000"]));
    profile
        .metadata
        .insert("tone".to_string(), "playful".into());
    profile
}

#[tokio::test]
async fn saved_products_round_trip_newest_first() {
    let store = setup_in_memory().await;
    let older = product("s1", "u1", 1, Some(&[1, 2]));
    let newer = product("s2", "u1", 2, None);
    let other_user = product("s3", "u2", 3, Some(&[3]));

    for p in [&older, &newer, &other_user] {
        store.service.save_product_to_library(p).await.unwrap();
    }

    let products = store.service.get_saved_products_for_user("u1").await.unwrap();
    assert_eq!(products, vec![newer, older]);
}

#[tokio::test]
async fn deleting_a_product_removes_its_image() {
    let store = setup_in_memory().await;
    let saved = product("s1", "u1", 1, Some(&[1, 2]));
    store.service.save_product_to_library(&saved).await.unwrap();

    store.service.delete_product_from_library("s1").await.unwrap();
    store.service.delete_product_from_library("s1").await.unwrap();

    assert!(store
        .service
        .get_saved_products_for_user("u1")
        .await
        .unwrap()
        .is_empty());
    assert_eq!(store.media.get("s1-img").await.unwrap(), None);
}

#[tokio::test]
async fn brand_profile_is_keyed_by_user() {
    let store = setup_in_memory().await;
    let profile = brand_profile("u1", &[7, 7, 7]);
    store.service.save_brand_profile(&profile).await.unwrap();

    let loaded = store.service.get_brand_profile("u1").await.unwrap();
    assert_eq!(loaded, Some(profile.clone()));
    assert!(store.service.get_brand_profile("u2").await.unwrap().is_none());

    let mut updated = profile;
    updated.logo = Some(image("u1-logo-v2", &[8]));
    updated.updated_at = at(9);
    store.service.save_brand_profile(&updated).await.unwrap();

    let loaded = store.service.get_brand_profile("u1").await.unwrap().unwrap();
    assert_eq!(loaded.logo.unwrap().binary_content, Some(vec![8]));
}

#[tokio::test]
async fn deleting_a_brand_profile_removes_the_logo() {
    let store = setup_in_memory().await;
    store
        .service
        .save_brand_profile(&brand_profile("u1", &[7]))
        .await
        .unwrap();

    store.service.delete_brand_profile("u1").await.unwrap();
    store.service.delete_brand_profile("u1").await.unwrap();

    assert!(store.service.get_brand_profile("u1").await.unwrap().is_none());
    assert_eq!(store.media.get("u1-logo").await.unwrap(), None);
}

#[tokio::test]
async fn brand_profile_with_missing_logo_blob_still_loads() {
    let store = setup_in_memory().await;
    store
        .service
        .save_brand_profile(&brand_profile("u1", &[7]))
        .await
        .unwrap();
    store.media.delete("u1-logo").await.unwrap();

    let loaded = store.service.get_brand_profile("u1").await.unwrap().unwrap();
    let logo = loaded.logo.unwrap();
    assert_eq!(logo.id, "u1-logo");
    assert!(logo.binary_content.is_none());
    assert_eq!(loaded.metadata["tone"], "playful");
}
