//! Integration tests for site provisioning, binding, and row locking.

use assert_matches::assert_matches;
use mes_core::error::CoreError;
use mes_core::site::{SiteContents, SiteKey, SiteType};
use mes_db::models::resource::CreateResource;
use mes_db::models::site::{BindResource, BindSite, CreateSite};
use mes_db::repositories::{ResourceRepo, SiteRepo};
use mes_db::RepoError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_site(name: &str, site_type: SiteType) -> CreateSite {
    CreateSite {
        station: "MIXER-1".to_string(),
        name: name.to_string(),
        index: 0,
        site_type,
    }
}

fn key(name: &str) -> SiteKey {
    SiteKey {
        station: "MIXER-1".to_string(),
        name: name.to_string(),
        index: 0,
    }
}

async fn seed_resource(pool: &PgPool, resource_id: &str, quantity: Decimal) {
    let input = CreateResource {
        resource_id: resource_id.to_string(),
        product_type: "RUBBER".to_string(),
        product_id: "P-100".to_string(),
        grade: "A".to_string(),
        status: None,
        quantity,
        expiry_time: None,
        inspections: vec![],
        feed_record_ids: vec![],
        remark: String::new(),
        stock_in: None,
    };
    ResourceRepo::create(pool, "op1", &input).await.unwrap();
}

fn bind(resource_id: &str, quantity: Option<Decimal>) -> BindSite {
    BindSite {
        resources: vec![BindResource {
            resource_id: resource_id.to_string(),
            product_type: "RUBBER".to_string(),
            quantity,
        }],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_site_starts_empty(pool: PgPool) {
    let site = SiteRepo::create(&pool, &new_site("HOPPER", SiteType::Queue))
        .await
        .unwrap();
    assert_eq!(site.checked_type().unwrap(), SiteType::Queue);
    assert!(site.contents.0.is_empty());

    let found = SiteRepo::find(&pool, &key("HOPPER")).await.unwrap().unwrap();
    assert_eq!(found.id, site.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_site_is_conflict(pool: PgPool) {
    SiteRepo::create(&pool, &new_site("HOPPER", SiteType::Slot))
        .await
        .unwrap();
    let result = SiteRepo::create(&pool, &new_site("HOPPER", SiteType::Container)).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bind_defaults_to_ledger_quantity(pool: PgPool) {
    seed_resource(&pool, "R1", dec!(10)).await;
    SiteRepo::create(&pool, &new_site("HOPPER", SiteType::Slot))
        .await
        .unwrap();

    let site = SiteRepo::bind(&pool, &key("HOPPER"), &bind("R1", None))
        .await
        .unwrap();
    assert_matches!(&site.contents.0, SiteContents::Slot(slot) if slot.material.is_some());
    assert_eq!(site.contents.0.total_quantity(), dec!(10));

    // Rebinding a slot replaces the material.
    seed_resource(&pool, "R2", dec!(3)).await;
    let site = SiteRepo::bind(&pool, &key("HOPPER"), &bind("R2", None))
        .await
        .unwrap();
    assert_eq!(site.contents.0.lots()[0].resource_id, "R2");
    assert_eq!(site.contents.0.total_quantity(), dec!(3));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bind_more_than_ledger_is_rejected(pool: PgPool) {
    seed_resource(&pool, "R1", dec!(10)).await;
    SiteRepo::create(&pool, &new_site("HOPPER", SiteType::Container))
        .await
        .unwrap();

    let result = SiteRepo::bind(&pool, &key("HOPPER"), &bind("R1", Some(dec!(11)))).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::Validation(_))));

    let result = SiteRepo::bind(&pool, &key("HOPPER"), &bind("GHOST", None)).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::NotFound { .. })));

    let site = SiteRepo::find(&pool, &key("HOPPER")).await.unwrap().unwrap();
    assert!(site.contents.0.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_clear_keeps_ledger(pool: PgPool) {
    seed_resource(&pool, "R1", dec!(10)).await;
    SiteRepo::create(&pool, &new_site("HOPPER", SiteType::Collection))
        .await
        .unwrap();
    SiteRepo::bind(&pool, &key("HOPPER"), &bind("R1", Some(dec!(4))))
        .await
        .unwrap();

    let site = SiteRepo::clear(&pool, &key("HOPPER")).await.unwrap();
    assert!(site.contents.0.is_empty());

    let resource = ResourceRepo::find(&pool, &mes_core::resource::ResourceKey::new("R1", "RUBBER"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resource.quantity, dec!(10));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_locked_site_fails_fast(pool: PgPool) {
    SiteRepo::create(&pool, &new_site("HOPPER", SiteType::Slot))
        .await
        .unwrap();

    let mut holder = pool.begin().await.unwrap();
    SiteRepo::lock_contents_nowait(&mut holder, &key("HOPPER"))
        .await
        .unwrap();

    let result = SiteRepo::clear(&pool, &key("HOPPER")).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::LockContention(_))));

    holder.rollback().await.unwrap();
    assert!(SiteRepo::clear(&pool, &key("HOPPER")).await.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_site_is_not_found(pool: PgPool) {
    let result = SiteRepo::clear(&pool, &key("NOWHERE")).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::NotFound { .. })));
}
