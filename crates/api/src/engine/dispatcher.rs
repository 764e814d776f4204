//! Per-instruction feed dispatch.
//!
//! Turns one [`FeedPerSite`] into the [`FeedDetail`] recorded for it and the
//! ledger decrements it implies. Site instructions mutate the site contents
//! under a `NOWAIT` lock; resource instructions only read the ledger here and
//! leave the actual decrement to the aggregated step of the orchestrator.

use mes_core::error::CoreError;
use mes_core::feed::{FeedDetail, FeedPerSite, FeedResource, LedgerDecrement, ResourceFeed};
use mes_core::site::{Lot, SiteKey};
use mes_core::types::{round_quantity, Quantity};
use mes_db::repositories::{ResourceRepo, SiteRepo};
use mes_db::RepoResult;
use sqlx::{Postgres, Transaction};

/// Result of dispatching one instruction.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub detail: FeedDetail,
    pub decrements: Vec<LedgerDecrement>,
}

/// Dispatch one instruction inside the feed transaction.
pub async fn dispatch(
    tx: &mut Transaction<'_, Postgres>,
    instruction: &FeedPerSite,
) -> RepoResult<Dispatched> {
    match instruction {
        FeedPerSite::BySite {
            site,
            feed_all,
            quantity,
        } => feed_site(tx, site, *feed_all, *quantity).await,
        FeedPerSite::ByResource { site, resource } => {
            feed_resource(tx, Some(site.clone()), resource).await
        }
        FeedPerSite::ResourceOnly { resource } => feed_resource(tx, None, resource).await,
    }
}

async fn feed_site(
    tx: &mut Transaction<'_, Postgres>,
    key: &SiteKey,
    feed_all: bool,
    quantity: Option<Quantity>,
) -> RepoResult<Dispatched> {
    let mut site = SiteRepo::lock_contents_nowait(tx, key).await?;

    let (consumed, decrements) = if feed_all {
        (site.contents.0.feed_all(), Vec::new())
    } else {
        let quantity = quantity.ok_or_else(|| {
            CoreError::Validation("quantity is required unless feed_all is set".into())
        })?;
        let partial = site.contents.0.feed(round_quantity(quantity))?;
        let decrements: Vec<LedgerDecrement> = if partial.sync_ledger {
            partial.consumed.iter().map(decrement_for).collect()
        } else {
            Vec::new()
        };
        (partial.consumed, decrements)
    };

    SiteRepo::save_contents(tx, site.id, &site.contents.0).await?;

    tracing::debug!(
        site = %key,
        feed_all,
        lots = consumed.len(),
        decrements = decrements.len(),
        "Site fed",
    );
    Ok(Dispatched {
        detail: FeedDetail {
            site: Some(key.clone()),
            resources: consumed.into_iter().map(FeedResource::from).collect(),
        },
        decrements,
    })
}

async fn feed_resource(
    tx: &mut Transaction<'_, Postgres>,
    site: Option<SiteKey>,
    feed: &ResourceFeed,
) -> RepoResult<Dispatched> {
    let key = feed.key();
    let quantity = round_quantity(feed.quantity);
    let Some(resource) = ResourceRepo::find_in(tx, &key).await? else {
        tracing::warn!(
            resource = %key,
            %quantity,
            "Direct feed references a resource missing from the ledger; recording it unresolved",
        );
        return Ok(Dispatched {
            detail: FeedDetail {
                site,
                resources: vec![FeedResource::unresolved(&key, quantity)],
            },
            decrements: Vec::new(),
        });
    };

    if quantity > resource.quantity {
        return Err(CoreError::Validation(format!(
            "insufficient quantity of {key}: requested {quantity}, available {}",
            resource.quantity
        ))
        .into());
    }

    Ok(Dispatched {
        detail: FeedDetail {
            site,
            resources: vec![FeedResource::from(resource.to_lot(quantity))],
        },
        decrements: vec![LedgerDecrement { key, quantity }],
    })
}

fn decrement_for(lot: &Lot) -> LedgerDecrement {
    LedgerDecrement {
        key: lot.key(),
        quantity: lot.quantity,
    }
}
