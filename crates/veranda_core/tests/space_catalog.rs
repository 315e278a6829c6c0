use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::tempdir;
use veranda_core::{
    AppServices, CoreConfig, DbLocation, Latency, ManualClock, SpaceCategory, SpaceDraft,
    SpaceFilter, SpaceUpdate,
};

fn config(path: &std::path::Path) -> CoreConfig {
    CoreConfig {
        database: DbLocation::File(path.to_path_buf()),
        latency: Latency::None,
    }
}

fn open(path: &std::path::Path, clock: &Arc<ManualClock>) -> AppServices {
    AppServices::open_with_clock(&config(path), clock.clone()).unwrap()
}

fn pavilion_draft() -> SpaceDraft {
    SpaceDraft {
        name: "Pool Pavilion".to_string(),
        category: SpaceCategory::EventSpace,
        description: "Open-sided pavilion next to the pool.".to_string(),
        images: Vec::new(),
        features: vec!["poolside".to_string()],
        capacity: Some(40),
        price: None,
        currency: Some("EUR".to_string()),
        available: true,
        details: None,
    }
}

#[test]
fn catalog_mutations_survive_a_restart_through_the_cache() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("veranda.db");
    let clock = Arc::new(ManualClock::starting_at(1_000_000));

    let app = open(&path, &clock);
    assert_eq!(app.spaces.spaces().len(), 6);
    let created = app.spaces.create(pavilion_draft());
    drop(app);

    clock.advance_ms(60_000);
    let app = open(&path, &clock);
    let spaces = app.spaces.spaces();
    assert_eq!(spaces.len(), 7);
    assert!(spaces.iter().any(|s| s.id == created.id));
}

#[test]
fn stale_cache_falls_back_to_fixtures() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("veranda.db");
    let clock = Arc::new(ManualClock::starting_at(0));

    let app = open(&path, &clock);
    app.spaces.create(pavilion_draft());
    assert_eq!(app.spaces.spaces().len(), 7);
    drop(app);

    // One tick past the catalog TTL: the cached entry reads as a miss.
    clock.advance_ms(3_600_000 + 1);
    let app = open(&path, &clock);
    assert_eq!(app.spaces.spaces().len(), 6);
}

#[test]
fn update_patches_one_space_and_publishes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("veranda.db");
    let clock = Arc::new(ManualClock::starting_at(0));
    let app = open(&path, &clock);

    let publishes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&publishes);
    let _sub = app.spaces.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let target = app.spaces.by_category(SpaceCategory::Room)[0].clone();
    let updated = app
        .spaces
        .update(
            target.id,
            &SpaceUpdate {
                price: Some(199.0),
                ..SpaceUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.price, Some(199.0));
    assert_eq!(updated.name, target.name);
    assert_eq!(publishes.load(Ordering::SeqCst), 2);

    // Unknown ids change nothing and publish nothing.
    assert!(app
        .spaces
        .update(uuid::Uuid::new_v4(), &SpaceUpdate::default())
        .is_none());
    assert_eq!(publishes.load(Ordering::SeqCst), 2);
}

#[test]
fn availability_flag_drives_the_filter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("veranda.db");
    let clock = Arc::new(ManualClock::starting_at(0));
    let app = open(&path, &clock);

    let rooms = app.spaces.by_category(SpaceCategory::Room);
    app.spaces.set_availability(rooms[0].id, false).unwrap();

    let filter = SpaceFilter {
        category: Some(SpaceCategory::Room),
        available_only: true,
        ..SpaceFilter::default()
    };
    let hits = app.spaces.search(&filter);
    assert_eq!(hits.len(), rooms.len() - 1);
    assert!(hits.iter().all(|s| s.id != rooms[0].id));
}

#[test]
fn search_combines_capacity_and_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("veranda.db");
    let clock = Arc::new(ManualClock::starting_at(0));
    let app = open(&path, &clock);

    let filter = SpaceFilter {
        min_capacity: Some(50),
        text: Some("banquet".to_string()),
        ..SpaceFilter::default()
    };
    // Capacity cuts the catalog to the restaurant and the hall; the text
    // (a layout name is not searched, the description is) leaves none.
    assert!(app.spaces.search(&filter).is_empty());

    let filter = SpaceFilter {
        min_capacity: Some(50),
        text: Some("weddings".to_string()),
        ..SpaceFilter::default()
    };
    let hits = app.spaces.search(&filter);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Orangery Hall");
}

#[test]
fn refresh_restores_the_seed_catalog_everywhere() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("veranda.db");
    let clock = Arc::new(ManualClock::starting_at(0));

    let app = open(&path, &clock);
    app.spaces.create(pavilion_draft());
    let refreshed = app.spaces.refresh();
    assert_eq!(refreshed.len(), 6);
    drop(app);

    // The re-primed cache also holds the seed catalog again.
    let app = open(&path, &clock);
    assert_eq!(app.spaces.spaces().len(), 6);
}
