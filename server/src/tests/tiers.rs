use shared::{NewTier, TierCategory};

use super::*;
use crate::{error::Error, tiers::TierPatch};

fn legend(level: u32, min_score: u32, max_score: u32, overall_order: u32) -> NewTier {
    NewTier {
        category: TierCategory::Legend,
        level,
        min_score,
        max_score,
        overall_order,
        tier_multiplier: 3.0,
    }
}

#[rocket::async_test]
async fn default_ladder_is_seeded_once() {
    let server = ServerExt::new().await;

    let tiers = server.backend.tiers().await.unwrap();
    assert_eq!(tiers.len(), 10);
    assert_eq!(tiers[0].title, "Rookie 1");
    assert!(tiers[0].is_default());
    assert_eq!(tiers[9].title, "Legend 1");
    assert!(server.backend.ladder().await.unwrap().issues().is_empty());

    assert_eq!(server.backend.seed_default_tiers().await.unwrap(), 0);
    assert_eq!(server.backend.tiers().await.unwrap().len(), 10);
}

#[rocket::async_test]
async fn resolution_is_monotonic() {
    let server = ServerExt::new().await;
    let ladder = server.backend.ladder().await.unwrap();

    let mut previous = 0;
    for score in (0..6000).step_by(7) {
        let order = ladder.resolve(score).unwrap().overall_order;
        assert!(order >= previous, "score {score} resolved lower");
        previous = order;
    }
}

#[rocket::async_test]
async fn tier_writes_are_validated() {
    let server = ServerExt::with_settings(Settings {
        store: StoreKind::Memory,
        seed_default_tiers: false,
        ..Default::default()
    })
    .await;

    let first = server.backend.create_tier(legend(1, 0, 99, 1)).await.unwrap();
    assert_eq!(first.title, "Legend 1");

    let duplicate_title = server.backend.create_tier(legend(1, 100, 199, 2)).await;
    assert!(matches!(duplicate_title, Err(Error::Conflict(_))));

    let duplicate_order = server.backend.create_tier(legend(2, 100, 199, 1)).await;
    assert!(matches!(duplicate_order, Err(Error::Conflict(_))));

    let overlapping = server.backend.create_tier(legend(2, 50, 199, 2)).await;
    assert!(matches!(overlapping, Err(Error::Conflict(_))));

    let inverted = server.backend.create_tier(legend(2, 300, 200, 2)).await;
    assert!(matches!(inverted, Err(Error::Validation(_))));

    let zero_level = server.backend.create_tier(legend(0, 100, 199, 2)).await;
    assert!(matches!(zero_level, Err(Error::Validation(_))));
}

#[rocket::async_test]
async fn updates_recompute_title_and_refresh_the_cache() {
    let server = ServerExt::new().await;
    let legend = server.backend.ladder().await.unwrap().resolve(5000).unwrap().clone();

    let updated = server
        .backend
        .update_tier(
            legend.id,
            TierPatch {
                category: Some(TierCategory::Elite),
                level: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Elite 4");
    assert_eq!(updated.min_score, legend.min_score);

    let resolved = server.backend.ladder().await.unwrap().resolve(5000).unwrap().clone();
    assert_eq!(resolved.title, "Elite 4");

    let clash = server
        .backend
        .update_tier(
            legend.id,
            TierPatch {
                min_score: Some(3500),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(clash, Err(Error::Conflict(_))));
    assert!(matches!(
        server.backend.update_tier(999, TierPatch::default()).await,
        Err(Error::NotFound(_))
    ));
}

#[rocket::async_test]
async fn deleted_tiers_leave_the_ladder() {
    let server = ServerExt::new().await;
    let legend = server.backend.ladder().await.unwrap().resolve(5000).unwrap().clone();

    server.backend.delete_tier(legend.id).await.unwrap();
    assert!(server.backend.ladder().await.unwrap().resolve(5000).is_none());
    assert!(matches!(
        server.backend.delete_tier(legend.id).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        server.backend.tier(legend.id).await,
        Err(Error::NotFound(_))
    ));
}
