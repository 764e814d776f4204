//! Repository for `sites` and their `site_contents`.
//!
//! The contents row is the unit of locking: every mutation takes
//! `FOR UPDATE OF c NOWAIT` on it, so two operators working the same site
//! fail fast instead of queueing.

use mes_core::error::CoreError;
use mes_core::resource::ResourceKey;
use mes_core::site::{Lot, SiteContents, SiteKey};
use mes_core::types::{positive_quantity, DbId};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{is_unique_violation, RepoError, RepoResult};
use crate::models::site::{BindSite, CreateSite, Site};
use crate::repositories::ResourceRepo;

/// Column list for the `sites s JOIN site_contents c` projection.
const COLUMNS: &str = "\
    s.id, s.station, s.name, s.site_index, s.site_type, c.contents, \
    s.created_at, c.updated_at";

const FROM_JOIN: &str = "sites s JOIN site_contents c ON c.site_id = s.id";

pub struct SiteRepo;

impl SiteRepo {
    /// Provision a site with empty contents of its declared type.
    pub async fn create(pool: &PgPool, input: &CreateSite) -> RepoResult<Site> {
        let key = SiteKey {
            station: input.station.clone(),
            name: input.name.clone(),
            index: input.index,
        };
        let mut tx = pool.begin().await?;

        let site_id: DbId = sqlx::query_scalar(
            "INSERT INTO sites (station, name, site_index, site_type) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&input.station)
        .bind(&input.name)
        .bind(input.index)
        .bind(input.site_type.id())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "uq_sites_station_name_index") {
                RepoError::from(CoreError::Conflict(format!("site {key} already exists")))
            } else {
                RepoError::from(e)
            }
        })?;

        sqlx::query("INSERT INTO site_contents (site_id, contents) VALUES ($1, $2)")
            .bind(site_id)
            .bind(Json(input.site_type.empty_contents()))
            .execute(&mut *tx)
            .await?;

        let site = Self::find_in(&mut tx, &key)
            .await?
            .ok_or_else(|| CoreError::Internal(format!("site {key} vanished after insert")))?;
        tx.commit().await?;

        tracing::info!(site = %key, site_type = ?input.site_type, "Site provisioned");
        Ok(site)
    }

    /// Find a site and its current contents.
    pub async fn find(pool: &PgPool, key: &SiteKey) -> Result<Option<Site>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOIN} \
             WHERE s.station = $1 AND s.name = $2 AND s.site_index = $3"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(&key.station)
            .bind(&key.name)
            .bind(key.index)
            .fetch_optional(pool)
            .await
    }

    async fn find_in(
        tx: &mut Transaction<'_, Postgres>,
        key: &SiteKey,
    ) -> Result<Option<Site>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOIN} \
             WHERE s.station = $1 AND s.name = $2 AND s.site_index = $3"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(&key.station)
            .bind(&key.name)
            .bind(key.index)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Lock a site's contents row, failing at once if another transaction
    /// holds it.
    ///
    /// Returns the site with contents whose variant has been checked against
    /// the declared type.
    pub async fn lock_contents_nowait(
        tx: &mut Transaction<'_, Postgres>,
        key: &SiteKey,
    ) -> RepoResult<Site> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOIN} \
             WHERE s.station = $1 AND s.name = $2 AND s.site_index = $3 \
             FOR UPDATE OF c NOWAIT"
        );
        let site = sqlx::query_as::<_, Site>(&query)
            .bind(&key.station)
            .bind(&key.name)
            .bind(key.index)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| CoreError::not_found("Site", key))?;
        site.checked_type()?;
        Ok(site)
    }

    /// Write back the contents of a locked site.
    pub async fn save_contents(
        tx: &mut Transaction<'_, Postgres>,
        site_id: DbId,
        contents: &SiteContents,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE site_contents SET contents = $2, updated_at = NOW() WHERE site_id = $1",
        )
        .bind(site_id)
        .bind(Json(contents))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Load ledger resources into a site.
    ///
    /// Each lot copies the ledger row's descriptive fields. A lot's quantity
    /// defaults to the ledger quantity and may not exceed it. The ledger
    /// itself is not changed.
    pub async fn bind(pool: &PgPool, key: &SiteKey, input: &BindSite) -> RepoResult<Site> {
        let mut tx = pool.begin().await?;
        let mut site = Self::lock_contents_nowait(&mut tx, key).await?;

        let mut lots: Vec<Lot> = Vec::with_capacity(input.resources.len());
        for item in &input.resources {
            let resource_key = ResourceKey::new(&item.resource_id, &item.product_type);
            let resource = ResourceRepo::find_in(&mut tx, &resource_key)
                .await?
                .ok_or_else(|| CoreError::not_found("MaterialResource", &resource_key))?;
            let quantity = match item.quantity {
                Some(q) => {
                    let q = positive_quantity(q, "quantity")?;
                    if q > resource.quantity {
                        return Err(CoreError::Validation(format!(
                            "cannot bind {q} of {resource_key}: ledger holds {}",
                            resource.quantity
                        ))
                        .into());
                    }
                    q
                }
                None => positive_quantity(resource.quantity, "quantity")?,
            };
            lots.push(resource.to_lot(quantity));
        }

        site.contents.0.bind(lots)?;
        Self::save_contents(&mut tx, site.id, &site.contents.0).await?;
        tx.commit().await?;

        tracing::info!(
            site = %key,
            resources = input.resources.len(),
            total = %site.contents.0.total_quantity(),
            "Resources bound to site",
        );
        Ok(site)
    }

    /// Empty a site without touching the ledger.
    pub async fn clear(pool: &PgPool, key: &SiteKey) -> RepoResult<Site> {
        let mut tx = pool.begin().await?;
        let mut site = Self::lock_contents_nowait(&mut tx, key).await?;

        let discarded = site.contents.0.clear();
        Self::save_contents(&mut tx, site.id, &site.contents.0).await?;
        tx.commit().await?;

        tracing::info!(site = %key, lots = discarded.len(), "Site cleared");
        Ok(site)
    }
}
