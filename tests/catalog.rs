//! Catalog store and filtering tests

use voicestar::{CatalogStore, Category, CategoryFilter};

mod common;

use common::{fixture_catalog, MockService};

fn store() -> CatalogStore {
    CatalogStore::with_celebrities(fixture_catalog())
}

#[test]
fn unfiltered_view_shows_everything_in_source_order() {
    let store = store();
    let ids: Vec<&str> = store.visible().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn category_filter_selects_matching_category() {
    let mut store = store();
    store.set_category(CategoryFilter::Only(Category::Tollywood));

    let visible = store.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "b");
    assert_eq!(visible[0].name, "Priya");
}

#[test]
fn query_matches_voice_characteristics() {
    let mut store = store();
    store.set_category(CategoryFilter::All);
    store.set_query("deep");

    let visible = store.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "a");
}

#[test]
fn query_matches_name_case_insensitively() {
    let mut store = store();
    store.set_query("PRIYA");
    assert_eq!(store.visible()[0].id, "b");

    store.set_query("GRAVELLY");
    assert_eq!(store.visible()[0].id, "a");
}

#[test]
fn category_and_query_intersect() {
    let mut store = store();
    store.set_query("deep");
    store.set_category(CategoryFilter::Only(Category::Tollywood));

    // "deep" only matches a bollywood entry; the intersection is empty
    assert!(store.visible().is_empty());
}

#[test]
fn whitespace_only_query_matches_everything() {
    let mut store = store();
    store.set_query("   ");
    assert_eq!(store.visible().len(), 3);
}

#[test]
fn filtering_never_mutates_the_source_collection() {
    let mut store = store();
    let before: Vec<String> = store.celebrities().iter().map(|c| c.id.clone()).collect();

    store.set_category(CategoryFilter::Only(Category::Regional));
    store.set_query("deep");
    let _ = store.visible();
    store.set_category(CategoryFilter::All);
    store.set_query("");
    let _ = store.visible();

    let after: Vec<String> = store.celebrities().iter().map(|c| c.id.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn filtering_is_deterministic() {
    let mut store = store();
    store.set_query("a");

    let first: Vec<&str> = store.visible().iter().map(|c| c.id.as_str()).collect();
    let second: Vec<&str> = store.visible().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(first, second);
}

#[test]
fn default_target_is_first_entry() {
    let store = store();
    assert_eq!(store.default_target().unwrap().id, "a");

    let empty = CatalogStore::new();
    assert!(empty.default_target().is_none());
}

#[test]
fn load_populates_collection() {
    let service = MockService::new();
    let mut store = CatalogStore::new();

    tokio_test::block_on(store.load(&service)).unwrap();
    assert_eq!(store.celebrities().len(), 3);
    assert_eq!(store.default_target().unwrap().id, "a");
}

#[test]
fn failed_load_keeps_store_empty_and_is_retryable() {
    let failing = MockService::failing_catalog();
    let mut store = CatalogStore::new();

    let err = tokio_test::block_on(store.load(&failing)).unwrap_err();
    assert!(matches!(err, voicestar::Error::Catalog(_)));
    assert!(store.celebrities().is_empty());

    // Retry against a healthy service succeeds
    let healthy = MockService::new();
    tokio_test::block_on(store.load(&healthy)).unwrap();
    assert_eq!(store.celebrities().len(), 3);
}

#[test]
fn category_tags_round_trip() {
    for tag in ["bollywood", "tollywood", "kollywood", "regional"] {
        assert_eq!(Category::parse(tag).unwrap().as_str(), tag);
    }
    assert_eq!(Category::parse("Bollywood"), Some(Category::Bollywood));
    assert_eq!(Category::parse("hollywood"), None);
}
