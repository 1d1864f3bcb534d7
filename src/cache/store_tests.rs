use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use super::config::CacheConfig;
use super::disk::{DiskTier, is_cache_file_name};
use super::store::{CacheStore, CacheStoreHandle};
use super::types::CacheStatus;
use crate::constants::CACHE_INDEX_FILENAME;

const HOUR: Duration = Duration::from_secs(3600);

fn json_value(payload: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({ "data": payload })).expect("serializable")
}

fn open_store(dir: &TempDir, max_size_bytes: u64) -> CacheStore {
    CacheStore::open(CacheConfig::persistent(dir.path()).max_size_bytes(max_size_bytes))
}

#[test]
fn test_open_creates_directory() {
    let temp = TempDir::new().expect("temp dir");
    let dir = temp.path().join("nested").join("cache");

    let store = CacheStore::open(CacheConfig::persistent(&dir));

    assert!(dir.is_dir());
    assert!(store.is_persistent());
    assert!(store.is_empty());
}

#[test]
fn test_put_get_delete() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, 1024 * 1024);

    store.put("k1", json_value("v1"), HOUR);
    assert_eq!(store.get("k1"), Some(json_value("v1")));
    assert_eq!(store.get("missing"), None);

    store.delete("k1");
    assert_eq!(store.get("k1"), None);

    store.delete("k1");
    store.delete("never-existed");
}

#[test]
fn test_lookup_reports_status() {
    let store = CacheStore::in_memory(1024);
    store.put("fresh", json_value("a"), HOUR);
    store.put("stale", json_value("b"), Duration::ZERO);

    assert_eq!(store.lookup("fresh").1, CacheStatus::Hit);
    assert_eq!(store.lookup("stale").1, CacheStatus::Expired);
    assert_eq!(store.lookup("stale").1, CacheStatus::Miss);
    assert_eq!(store.lookup("absent").1, CacheStatus::Miss);
}

#[test]
fn test_expired_entry_removed_on_read() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, 1024 * 1024);
    let disk = DiskTier::new(temp.path().to_path_buf());

    store.put("short", json_value("x"), Duration::ZERO);
    assert!(disk.data_path("short").exists());
    assert_eq!(store.stats().expired_count, 1);
    assert_eq!(store.stats().item_count, 1);

    assert_eq!(store.get("short"), None);
    assert!(!disk.data_path("short").exists());
    assert_eq!(store.stats().item_count, 0);
}

#[test]
fn test_size_budget_evicts_soonest_expiring() {
    let store = CacheStore::in_memory(100);

    store.put("first", vec![b'1'; 40], Duration::from_secs(60));
    store.put("second", vec![b'2'; 40], Duration::from_secs(600));
    store.put("third", vec![b'3'; 40], Duration::from_secs(6000));

    let stats = store.stats();
    assert!(stats.current_size_bytes <= stats.max_size_bytes);
    assert_eq!(stats.item_count, 2);
    assert_eq!(store.get("first"), None);
    assert!(store.get("second").is_some());
    assert!(store.get("third").is_some());
}

#[test]
fn test_eviction_prefers_expiry_over_insertion_order() {
    let store = CacheStore::in_memory(100);

    store.put("long_lived", vec![b'a'; 40], Duration::from_secs(6000));
    store.put("short_lived", vec![b'b'; 40], Duration::from_secs(60));
    store.put("newest", vec![b'c'; 40], Duration::from_secs(600));

    assert!(store.get("long_lived").is_some());
    assert_eq!(store.get("short_lived"), None);
    assert!(store.get("newest").is_some());
}

#[test]
fn test_oversized_entry_never_exceeds_budget() {
    let store = CacheStore::in_memory(10);
    store.put("huge", vec![b'x'; 64], HOUR);

    let stats = store.stats();
    assert!(stats.current_size_bytes <= 10);
    assert_eq!(store.get("huge"), None);
}

#[test]
fn test_eviction_removes_persisted_file() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, 60);
    let disk = DiskTier::new(temp.path().to_path_buf());

    let big = serde_json::to_vec(&"y".repeat(40)).expect("serializable");
    store.put("a", big.clone(), Duration::from_secs(10));
    store.put("b", big, Duration::from_secs(20));

    assert!(!disk.data_path("a").exists());
    assert!(disk.data_path("b").exists());
}

#[test]
fn test_persistence_across_reopen() {
    let temp = TempDir::new().expect("temp dir");

    {
        let store = open_store(&temp, 1024 * 1024);
        store.put("persist_test", json_value("data"), HOUR);
    }

    let reopened = open_store(&temp, 1024 * 1024);
    assert_eq!(reopened.get("persist_test"), Some(json_value("data")));
    assert_eq!(reopened.stats().item_count, 1);
}

#[test]
fn test_reopen_drops_expired_entries_and_files() {
    let temp = TempDir::new().expect("temp dir");
    let disk = DiskTier::new(temp.path().to_path_buf());

    {
        let store = open_store(&temp, 1024 * 1024);
        store.put("expired", json_value("old"), Duration::ZERO);
        store.put("alive", json_value("new"), HOUR);
    }
    assert!(disk.data_path("expired").exists());

    let reopened = open_store(&temp, 1024 * 1024);
    assert_eq!(reopened.len(), 1);
    assert!(!disk.data_path("expired").exists());
    assert!(reopened.get("alive").is_some());
}

#[test]
fn test_corrupt_index_degrades_to_empty_cache() {
    let temp = TempDir::new().expect("temp dir");

    {
        let store = open_store(&temp, 1024 * 1024);
        store.put("k", json_value("v"), HOUR);
    }
    fs::write(temp.path().join(CACHE_INDEX_FILENAME), b"{ not json").expect("write");

    let reopened = open_store(&temp, 1024 * 1024);
    assert!(reopened.is_empty());
    assert!(reopened.is_persistent());

    reopened.put("after", json_value("ok"), HOUR);
    assert!(reopened.get("after").is_some());
}

#[test]
fn test_corrupt_data_file_dropped_on_reopen() {
    let temp = TempDir::new().expect("temp dir");
    let disk = DiskTier::new(temp.path().to_path_buf());

    {
        let store = open_store(&temp, 1024 * 1024);
        store.put("bad", json_value("v"), HOUR);
        store.put("good", json_value("v"), HOUR);
    }
    fs::write(disk.data_path("bad"), b"\x00\x01garbage").expect("write");

    let reopened = open_store(&temp, 1024 * 1024);
    assert_eq!(reopened.get("bad"), None);
    assert!(reopened.get("good").is_some());
    assert!(!disk.data_path("bad").exists());
}

#[test]
fn test_index_records_expiry_and_size() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, 1024 * 1024);
    let value = json_value("sized");
    store.put("k", value.clone(), HOUR);

    let index = DiskTier::new(temp.path().to_path_buf())
        .read_index()
        .expect("readable")
        .expect("present");
    let record = index.get("k").expect("indexed");
    assert_eq!(record.size, value.len() as u64);
    assert!(record.expiry > chrono::Utc::now());
}

#[test]
fn test_clear_removes_everything() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, 1024 * 1024);
    store.put("a", json_value("1"), HOUR);
    store.put("b", json_value("2"), HOUR);
    fs::write(temp.path().join("unrelated.txt"), b"keep").expect("write");

    store.clear();

    assert!(store.is_empty());
    assert_eq!(store.stats().current_size_bytes, 0);
    assert!(!temp.path().join(CACHE_INDEX_FILENAME).exists());
    assert!(temp.path().join("unrelated.txt").exists());

    let reopened = open_store(&temp, 1024 * 1024);
    assert!(reopened.is_empty());
}

#[test]
fn test_clear_keeps_foreign_json_files() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, 1024 * 1024);
    store.put("k", json_value("v"), HOUR);
    fs::write(temp.path().join("package.json"), b"{}").expect("write");
    fs::write(temp.path().join("notes.tmp"), b"draft").expect("write");

    store.clear();

    assert!(store.is_empty());
    assert!(!DiskTier::new(temp.path().to_path_buf()).data_path("k").exists());
    assert!(temp.path().join("package.json").exists());
    assert!(temp.path().join("notes.tmp").exists());
}

#[test]
fn test_corrupt_index_recovery_keeps_foreign_json_files() {
    let temp = TempDir::new().expect("temp dir");
    {
        let store = open_store(&temp, 1024 * 1024);
        store.put("k", json_value("v"), HOUR);
    }
    fs::write(temp.path().join("settings.json"), b"{\"theme\":\"dark\"}").expect("write");
    fs::write(temp.path().join(CACHE_INDEX_FILENAME), b"{ broken").expect("write");

    let reopened = open_store(&temp, 1024 * 1024);

    assert!(reopened.is_empty());
    assert!(!DiskTier::new(temp.path().to_path_buf()).data_path("k").exists());
    assert!(temp.path().join("settings.json").exists());
}

#[test]
fn test_cache_file_names() {
    let disk = DiskTier::new(std::path::PathBuf::from("/cache"));
    let data = disk.data_path("some key");
    let data_name = data.file_name().and_then(|n| n.to_str()).expect("utf-8 name");
    let temp_name = data.with_extension("tmp");
    let temp_name = temp_name.file_name().and_then(|n| n.to_str()).expect("utf-8 name");

    assert!(is_cache_file_name(CACHE_INDEX_FILENAME));
    assert!(is_cache_file_name("cache_index.tmp"));
    assert!(is_cache_file_name(data_name));
    assert!(is_cache_file_name(temp_name));

    assert!(!is_cache_file_name("package.json"));
    assert!(!is_cache_file_name("settings.tmp"));
    assert!(!is_cache_file_name(&format!("{}.json", "A".repeat(32))));
    assert!(!is_cache_file_name(&format!("{}.json", "a".repeat(31))));
    assert!(!is_cache_file_name(&format!("{}.txt", "a".repeat(32))));
}

#[test]
fn test_failed_overwrite_not_rehydrated() {
    let temp = TempDir::new().expect("temp dir");
    let disk = DiskTier::new(temp.path().to_path_buf());
    let blocked_temp = disk.data_path("k").with_extension("tmp");

    {
        let store = open_store(&temp, 1024 * 1024);
        store.put("k", json_value("old"), HOUR);

        fs::create_dir(&blocked_temp).expect("block temp file");
        store.put("k", json_value("new"), HOUR * 10);
        assert_eq!(store.get("k"), Some(json_value("new")));
    }
    fs::remove_dir(&blocked_temp).expect("unblock");

    let reopened = open_store(&temp, 1024 * 1024);
    assert_eq!(reopened.get("k"), None);
    assert!(!disk.data_path("k").exists());
}

#[test]
fn test_sweep_expired() {
    let store = CacheStore::in_memory(1024);
    store.put("a", json_value("1"), Duration::ZERO);
    store.put("b", json_value("2"), Duration::ZERO);
    store.put("c", json_value("3"), HOUR);

    assert_eq!(store.sweep_expired(), 2);
    assert_eq!(store.len(), 1);
    assert_eq!(store.sweep_expired(), 0);
}

#[test]
fn test_stats_snapshot() {
    let store = CacheStore::in_memory(200);
    let value = vec![b'z'; 50];
    store.put("a", value, HOUR);

    let stats = store.stats();
    assert_eq!(stats.current_size_bytes, 50);
    assert_eq!(stats.max_size_bytes, 200);
    assert_eq!(stats.item_count, 1);
    assert_eq!(stats.expired_count, 0);
    assert!((stats.size_used_percentage - 25.0).abs() < 1e-9);
    assert!(!stats.persistent);
}

#[test]
fn test_unusable_directory_runs_memory_only() {
    let temp = TempDir::new().expect("temp dir");
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, b"file").expect("write");

    let store = CacheStore::open(CacheConfig::persistent(file_path.join("cache")));

    assert!(!store.is_persistent());
    store.insert("k", json_value("v"));
    assert!(store.get("k").is_some());
}

#[test]
fn test_handle_shares_store_across_threads() {
    let handle = CacheStoreHandle::new(CacheStore::in_memory(1024 * 1024));

    std::thread::scope(|scope| {
        for t in 0..4 {
            let handle = handle.clone();
            scope.spawn(move || {
                for i in 0..25 {
                    handle.put(&format!("{t}-{i}"), json_value("v"), HOUR);
                }
            });
        }
    });

    assert_eq!(handle.len(), 100);
    assert_eq!(handle.strong_count(), 1);
}
