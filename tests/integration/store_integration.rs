//! Record store tests over the sled backend

use reel::error::StorageError;
use reel::record::{CastMember, CrewMember, MovieRecord, ScoreBadge};
use reel::store::{MovieStore, SledBackend, StorageBackend, MOVIES_KEY};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

fn sled_store(temp_dir: &TempDir) -> (Arc<SledBackend>, MovieStore) {
    let backend = Arc::new(SledBackend::open(temp_dir.path().join("store")).unwrap());
    let store = MovieStore::new(backend.clone());
    (backend, store)
}

fn full_record(id: &str) -> MovieRecord {
    let mut record = MovieRecord::empty(id);
    record.title = Some("Arrival".to_string());
    record.trailer_url = Some("https://video/arrival.mp4".to_string());
    record.rating_code = Some("PG-13".to_string());
    record.duration_minutes = Some(116);
    record.critic_score = ScoreBadge {
        score: Some(94.0),
        icon_url: Some("https://img/certified.png".to_string()),
    };
    record.summary = Some("Linguist meets heptapods.".to_string());
    record.genres = vec!["Drama".to_string(), "Sci-Fi".to_string()];
    record.release_date = Some("2016-11-11".to_string());
    record.cast = vec![CastMember {
        id: Uuid::new_v4(),
        name: Some("Amy Adams".to_string()),
        character_name: Some("Louise Banks".to_string()),
        headshot_url: Some("https://img/amy.jpg".to_string()),
    }];
    record.crew = vec![CrewMember {
        id: Uuid::new_v4(),
        name: Some("Denis Villeneuve".to_string()),
        role: Some("Director".to_string()),
        headshot_url: None,
    }];
    record
}

#[test]
fn test_append_then_get_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let (_, store) = sled_store(&temp_dir);
    let record = full_record("329");

    store.append(&record).unwrap();

    assert_eq!(store.get("329").unwrap(), Some(record));
    assert!(store.contains("329").unwrap());
    assert!(!store.contains("330").unwrap());
}

#[test]
fn test_duplicates_are_kept_and_first_wins() {
    let temp_dir = TempDir::new().unwrap();
    let (_, store) = sled_store(&temp_dir);
    let mut first = full_record("X");
    first.title = Some("First".to_string());
    let mut second = full_record("X");
    second.title = Some("Second".to_string());

    store.append(&first).unwrap();
    store.append(&second).unwrap();

    assert_eq!(store.len().unwrap(), 2);
    assert_eq!(store.get("X").unwrap().unwrap().title.as_deref(), Some("First"));
}

#[test]
fn test_collection_layout_is_a_json_array_under_one_key() {
    let temp_dir = TempDir::new().unwrap();
    let (backend, store) = sled_store(&temp_dir);
    store.append(&full_record("1")).unwrap();
    store.append(&full_record("2")).unwrap();

    let bytes = backend.read(MOVIES_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 2);
    assert_eq!(array[0]["id"], "1");
    assert_eq!(array[0]["durationMinutes"], 116);
    assert_eq!(array[1]["id"], "2");
}

#[test]
fn test_reads_legacy_field_names() {
    let temp_dir = TempDir::new().unwrap();
    let (backend, store) = sled_store(&temp_dir);
    let legacy = serde_json::json!([{
        "id": "11",
        "title": "Heat",
        "trailer": "https://video/heat.mp4",
        "rating": "R",
        "duration": 170,
        "tomatoRatingObj": { "tomatoRating": 83, "tomatoRatingImg": "https://img/fresh.png" },
        "userRatingObj": { "userRating": null, "userRatingImg": "https://img/popcorn.png" },
        "summary": "Cops and robbers.",
        "genres": ["Crime"],
        "cast": [{ "name": "Al Pacino", "characterName": "Vincent Hanna", "headShot": "https://img/al.jpg" }],
        "crew": null,
        "releaseDate": "1995-12-15",
        "someFutureField": true
    }]);
    backend
        .write(MOVIES_KEY, &serde_json::to_vec(&legacy).unwrap())
        .unwrap();

    let record = store.get("11").unwrap().unwrap();
    assert_eq!(record.trailer_url.as_deref(), Some("https://video/heat.mp4"));
    assert_eq!(record.rating_code.as_deref(), Some("R"));
    assert_eq!(record.duration_minutes, Some(170));
    assert_eq!(record.critic_score.score, Some(83.0));
    assert_eq!(record.audience_score.visible_icon(), None);
    assert_eq!(record.cast[0].headshot_url.as_deref(), Some("https://img/al.jpg"));
    assert!(record.crew.is_empty());
}

#[test]
fn test_corrupt_collection_reads_empty_and_is_never_overwritten() {
    let temp_dir = TempDir::new().unwrap();
    let (backend, store) = sled_store(&temp_dir);
    backend.write(MOVIES_KEY, b"{ not json").unwrap();

    assert!(store.list().unwrap().is_empty());
    assert_eq!(store.get("1").unwrap(), None);

    let result = store.append(&full_record("1"));
    assert!(matches!(result, Err(StorageError::CorruptCollection { .. })));
    assert_eq!(backend.read(MOVIES_KEY).unwrap().unwrap(), b"{ not json".to_vec());
}

#[test]
fn test_one_bad_element_does_not_poison_the_collection() {
    let temp_dir = TempDir::new().unwrap();
    let (backend, store) = sled_store(&temp_dir);
    let stored = br#"[{"id":"1","title":"Heat","duration":170},{"id":"2","title":"Odd","duration":95.5},{"id":null,"title":"Nameless"}]"#;
    backend.write(MOVIES_KEY, stored).unwrap();

    assert_eq!(store.get("1").unwrap().unwrap().title.as_deref(), Some("Heat"));
    assert_eq!(store.get("2").unwrap().unwrap().duration_minutes, Some(96));
    assert_eq!(store.list().unwrap().len(), 2);

    store.append(&full_record("3")).unwrap();
    drop(store);
    drop(backend);

    let (backend, store) = sled_store(&temp_dir);
    let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(store.scan().unwrap().skipped, 1);

    let bytes = backend.read(MOVIES_KEY).unwrap().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains(r#"{"id":"2","title":"Odd","duration":95.5}"#));
    assert!(text.contains(r#"{"id":null,"title":"Nameless"}"#));
}

#[test]
fn test_concurrent_appends_lose_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let (_, store) = sled_store(&temp_dir);
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || store.append(&full_record(&i.to_string())).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len().unwrap(), 8);
    for i in 0..8 {
        assert!(store.contains(&i.to_string()).unwrap());
    }
}

#[test]
fn test_custom_key_isolates_collections() {
    let temp_dir = TempDir::new().unwrap();
    let (backend, store) = sled_store(&temp_dir);
    let other = MovieStore::with_key(backend, "reel.movies.test");

    store.append(&full_record("1")).unwrap();

    assert_eq!(other.len().unwrap(), 0);
    assert_eq!(other.key(), "reel.movies.test");
}
