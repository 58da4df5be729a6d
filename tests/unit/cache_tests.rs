/*!
 * Tests for the expiring cache
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bierdopje_provider::ExpiringCache;

const LONG: Duration = Duration::from_secs(3600);

#[test]
fn test_insert_withLiveEntry_shouldReturnValue() {
    let cache: ExpiringCache<String, u32> = ExpiringCache::new();
    cache.insert("lost".to_string(), 42, LONG);
    assert_eq!(cache.get(&"lost".to_string()), Some(42));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_get_withExpiredEntry_shouldMiss() {
    let cache: ExpiringCache<String, u32> = ExpiringCache::new();
    cache.insert("lost".to_string(), 42, Duration::ZERO);
    assert_eq!(cache.get(&"lost".to_string()), None);

    cache.purge_expired();
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_getOrCompute_calledTwice_shouldComputeOnce() {
    let cache: ExpiringCache<(String, Option<u16>), Option<u32>> = ExpiringCache::new();
    let calls = AtomicUsize::new(0);

    for _ in 0..2 {
        let value: Result<Option<u32>, String> = cache
            .get_or_compute(("lost".to_string(), Some(2004)), LONG, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Some(1))
            })
            .await;
        assert_eq!(value, Ok(Some(1)));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let (hits, misses, hit_rate) = cache.stats();
    assert_eq!((hits, misses), (1, 1));
    assert!((hit_rate - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_getOrCompute_withError_shouldNotStore() {
    let cache: ExpiringCache<String, u32> = ExpiringCache::new();

    let failed: Result<u32, String> = cache
        .get_or_compute("lost".to_string(), LONG, || async { Err("boom".to_string()) })
        .await;
    assert!(failed.is_err());
    assert!(cache.is_empty());

    let recovered: Result<u32, String> = cache
        .get_or_compute("lost".to_string(), LONG, || async { Ok(7) })
        .await;
    assert_eq!(recovered, Ok(7));
}

#[tokio::test]
async fn test_getOrCompute_withExpiredEntry_shouldRecompute() {
    let cache: ExpiringCache<String, u32> = ExpiringCache::new();
    cache.insert("lost".to_string(), 1, Duration::ZERO);

    let value: Result<u32, String> = cache
        .get_or_compute("lost".to_string(), LONG, || async { Ok(2) })
        .await;
    assert_eq!(value, Ok(2));
}

#[test]
fn test_clone_shouldShareStorage() {
    let cache: ExpiringCache<String, u32> = ExpiringCache::new();
    let shared = cache.clone();
    shared.insert("lost".to_string(), 3, LONG);
    assert_eq!(cache.get(&"lost".to_string()), Some(3));

    cache.clear();
    assert!(shared.is_empty());
    assert_eq!(shared.stats().0, 0);
}

#[tokio::test]
async fn test_getOrCompute_onMiss_shouldPurgeExpiredEntries() {
    let cache: ExpiringCache<String, u32> = ExpiringCache::new();
    cache.insert("stale".to_string(), 1, Duration::ZERO);
    assert_eq!(cache.len(), 1);

    let value: Result<u32, String> = cache
        .get_or_compute("fresh".to_string(), LONG, || async { Ok(2) })
        .await;

    assert_eq!(value, Ok(2));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&"fresh".to_string()), Some(2));
}
