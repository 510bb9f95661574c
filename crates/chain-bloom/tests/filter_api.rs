//! # Filter API Tests
//!
//! Drives both engines through `BloomFilterApi`.
//!
//! ## Test Categories
//!
//! 1. **Membership** - no false negatives, expected false positive rate
//! 2. **Isolation** - keys never observe each other
//! 3. **Atomicity** - one round trip per call, failed calls apply nothing
//! 4. **Agreement** - local and remote engines derive the same chain

use chain_bloom::domain::{chain_offsets, ChainMode};
use chain_bloom::{
    BloomConfig, BloomFilterApi, FilterError, InMemoryScriptStore, LocalFilterRegistry,
    Murmur3Encryptor, RemoteBloomFilter, StoreError,
};
use proptest::prelude::*;
use std::sync::Arc;

// =============================================================================
// TEST HELPERS
// =============================================================================

fn config(m: u32, k: u32) -> BloomConfig {
    BloomConfig::new(m, k).expect("valid config")
}

fn remote(m: u32, k: u32) -> (Arc<InMemoryScriptStore>, RemoteBloomFilter<InMemoryScriptStore>) {
    let store = Arc::new(InMemoryScriptStore::new());
    let filter = RemoteBloomFilter::new(config(m, k), store.clone()).expect("valid filter");
    (store, filter)
}

fn engines(m: u32, k: u32) -> Vec<(&'static str, Box<dyn BloomFilterApi>)> {
    let (_, remote) = remote(m, k);
    vec![
        (
            "local",
            Box::new(LocalFilterRegistry::new(config(m, k)).expect("valid registry")),
        ),
        ("remote", Box::new(remote)),
    ]
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

#[tokio::test]
async fn test_alpha_scenario_on_both_engines() {
    for (name, engine) in engines(64, 3) {
        engine.set("bloom", "alpha").await.unwrap();

        assert!(
            engine.exist("bloom", "alpha").await.unwrap(),
            "{}: inserted element must be found",
            name
        );
    }
}

#[tokio::test]
async fn test_no_false_negatives_after_many_inserts() {
    for (name, engine) in engines(1 << 16, 5) {
        for i in 0..2_000 {
            engine.set("bulk", &format!("element_{}", i)).await.unwrap();
        }

        for i in 0..2_000 {
            assert!(
                engine.exist("bulk", &format!("element_{}", i)).await.unwrap(),
                "{}: false negative for element_{}",
                name,
                i
            );
        }
    }
}

#[tokio::test]
async fn test_remote_fpr_is_low() {
    // Raw offsets span ~2^31 bits, so collisions are vanishingly rare
    let (_, filter) = remote(64, 3);
    for i in 0..500 {
        filter.set("urls", &format!("https://a.example/{}", i)).await.unwrap();
    }

    let mut positives = 0;
    for i in 0..5_000 {
        if filter
            .exist("urls", &format!("https://b.example/{}", i))
            .await
            .unwrap()
        {
            positives += 1;
        }
    }
    assert!(positives <= 5, "{} false positives out of 5000", positives);
}

// =============================================================================
// ISOLATION
// =============================================================================

#[tokio::test]
async fn test_keys_are_isolated_on_both_engines() {
    for (name, engine) in engines(4096, 4) {
        for i in 0..100 {
            engine.set("A", &format!("a_{}", i)).await.unwrap();
        }

        for i in 0..100 {
            assert!(
                !engine.exist("B", &format!("a_{}", i)).await.unwrap(),
                "{}: key B observed an element of key A",
                name
            );
        }
    }
}

#[tokio::test]
async fn test_remote_key_bits_untouched_by_other_key() {
    let (store, filter) = remote(64, 3);

    filter.set("A", "alpha").await.unwrap();
    let bits_a = store.bit_count("A");
    filter.set("B", "beta").await.unwrap();
    filter.set("B", "gamma").await.unwrap();

    assert_eq!(store.bit_count("A"), bits_a);
    assert!(!filter.exist("A", "beta").await.unwrap());
}

// =============================================================================
// ATOMICITY
// =============================================================================

#[tokio::test]
async fn test_one_round_trip_per_call() {
    let (store, filter) = remote(1024, 7);

    filter.set("k", "alpha").await.unwrap();
    filter.exist("k", "alpha").await.unwrap();
    filter.exist("k", "beta").await.unwrap();

    assert_eq!(store.eval_count(), 3, "k bits must travel in one script");
}

#[tokio::test]
async fn test_failed_set_is_not_visible() {
    let (store, filter) = remote(64, 3);
    store.fail_next(StoreError::Connection("connection reset".into()));

    let result = filter.set("k", "alpha").await;

    assert!(matches!(
        result,
        Err(FilterError::Store(StoreError::Connection(_)))
    ));
    assert_eq!(store.bit_count("k"), 0);
    assert!(!filter.exist("k", "alpha").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_remote_callers() {
    let (_, filter) = remote(1 << 20, 4);
    let filter = Arc::new(filter);

    let mut handles = Vec::new();
    for task in 0..8 {
        let filter = filter.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..200 {
                let val = format!("t{}-{}", task, i);
                filter.set("shared", &val).await.unwrap();
                assert!(filter.exist("shared", &val).await.unwrap());
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for task in 0..8 {
        for i in 0..200 {
            let val = format!("t{}-{}", task, i);
            assert!(filter.exist("shared", &val).await.unwrap());
        }
    }
}

// =============================================================================
// AGREEMENT
// =============================================================================

#[tokio::test]
async fn test_remote_bits_are_raw_chain_offsets() {
    let (store, filter) = remote(64, 3);

    filter.set("k", "alpha").await.unwrap();

    for offset in chain_offsets(&Murmur3Encryptor::new(), "alpha", 3, ChainMode::Raw) {
        assert!(store.get_bit("k", u64::from(offset)));
    }
}

#[tokio::test]
async fn test_two_clients_share_one_key() {
    // Two filters over one store stand in for two processes over one Redis
    let store = Arc::new(InMemoryScriptStore::new());
    let writer = RemoteBloomFilter::new(config(1 << 20, 5), store.clone()).unwrap();
    let reader = RemoteBloomFilter::new(config(1 << 20, 5), store).unwrap();

    writer.set("shared", "alpha").await.unwrap();

    assert!(reader.exist("shared", "alpha").await.unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_remote_no_false_negatives(
        elements in proptest::collection::vec("[a-z0-9:/._-]{1,32}", 1..32),
        k in 1u32..8,
    ) {
        let (_, filter) = remote(1 << 16, k);
        tokio_test::block_on(async {
            for elem in &elements {
                filter.set("prop", elem).await.unwrap();
            }
            for elem in &elements {
                assert!(filter.exist("prop", elem).await.unwrap());
            }
        });
    }
}
