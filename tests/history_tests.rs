// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for history collection against an in-memory reader
//!
//! Covers the cache-first flow: hits that never touch the chain, misses on a
//! different range, forced refreshes, skipped samples and the chain-tip guard.

mod helpers;

use std::time::Duration;

use helpers::{market_state, MockMarketReader};
use morphoscan::cache::{DiskCache, NoOpCache, SampleCache};
use morphoscan::{
    BlockRange, BlockSampler, CollectOptions, HistoryCollector, HistoryError, MarketHistory,
    UnixTimestamp,
};
use tempfile::TempDir;

fn collector(
    reader: MockMarketReader,
    cache: Box<dyn SampleCache>,
) -> HistoryCollector<MockMarketReader> {
    HistoryCollector::new(reader, cache)
        .with_sampler(BlockSampler::new(100).unwrap())
        .with_sample_delay(Duration::ZERO)
}

fn blocks_of(history: &MarketHistory) -> Vec<u64> {
    history.records().iter().map(|r| r.block_number).collect()
}

#[tokio::test]
async fn test_fetches_every_sampled_block_including_end() {
    let reader = MockMarketReader::new(1_000).with_linear_market(&[100, 200, 300, 350]);
    let collector = collector(reader, Box::new(NoOpCache));

    let history = collector
        .collect(BlockRange::new(100, 350).unwrap(), CollectOptions::default())
        .await
        .unwrap();

    assert_eq!(blocks_of(&history), vec![100, 200, 300, 350]);
    assert!(!history.from_cache());
    assert_eq!(collector.reader().state_calls(), 4);
    assert_eq!(collector.reader().latest_calls(), 1);
}

#[tokio::test]
async fn test_cache_hit_does_not_call_reader() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    let range = BlockRange::new(100, 300).unwrap();

    let first = collector(
        MockMarketReader::new(1_000).with_linear_market(&[100, 200, 300]),
        Box::new(DiskCache::new(&path)),
    );
    let fetched = first.collect(range, CollectOptions::default()).await.unwrap();
    assert_eq!(first.reader().state_calls(), 3);
    assert!(path.exists());

    let second = collector(MockMarketReader::new(1_000), Box::new(DiskCache::new(&path)));
    let cached = second.collect(range, CollectOptions::default()).await.unwrap();

    assert!(cached.from_cache());
    assert_eq!(cached.records(), fetched.records());
    assert_eq!(second.reader().state_calls(), 0);
    assert_eq!(second.reader().latest_calls(), 0);
}

#[tokio::test]
async fn test_different_range_misses_cache() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    let collector = collector(
        MockMarketReader::new(1_000).with_linear_market(&[100, 200, 300, 400]),
        Box::new(DiskCache::new(&path)),
    );

    collector
        .collect(BlockRange::new(100, 300).unwrap(), CollectOptions::default())
        .await
        .unwrap();
    assert_eq!(collector.reader().state_calls(), 3);

    let history = collector
        .collect(BlockRange::new(100, 400).unwrap(), CollectOptions::default())
        .await
        .unwrap();

    assert!(!history.from_cache());
    assert_eq!(blocks_of(&history), vec![100, 200, 300, 400]);
    assert_eq!(collector.reader().state_calls(), 7);
}

#[tokio::test]
async fn test_failed_sample_is_skipped_and_order_kept() {
    let reader = MockMarketReader::new(1_000)
        .with_linear_market(&[100, 200, 300, 350])
        .failing_at(200);
    let collector = collector(reader, Box::new(NoOpCache));

    let history = collector
        .collect(BlockRange::new(100, 350).unwrap(), CollectOptions::default())
        .await
        .unwrap();

    assert_eq!(blocks_of(&history), vec![100, 300, 350]);
    assert_eq!(collector.reader().state_calls(), 4);
}

#[tokio::test]
async fn test_no_cache_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    let collector = collector(
        MockMarketReader::new(1_000).with_linear_market(&[100, 200]),
        Box::new(DiskCache::new(&path)),
    );
    let options = CollectOptions {
        use_cache: false,
        force_refresh: false,
    };

    let history = collector
        .collect(BlockRange::new(100, 200).unwrap(), options)
        .await
        .unwrap();

    assert_eq!(history.len(), 2);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_force_refresh_refetches_and_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    let range = BlockRange::new(100, 200).unwrap();

    collector(
        MockMarketReader::new(1_000).with_linear_market(&[100, 200]),
        Box::new(DiskCache::new(&path)),
    )
    .collect(range, CollectOptions::default())
    .await
    .unwrap();

    let fresh = collector(
        MockMarketReader::new(1_000)
            .with_block(100, UnixTimestamp(1), market_state(5_000_000, 1_000_000))
            .with_block(200, UnixTimestamp(2), market_state(6_000_000, 3_000_000)),
        Box::new(DiskCache::new(&path)),
    );
    let options = CollectOptions {
        use_cache: true,
        force_refresh: true,
    };
    let refreshed = fresh.collect(range, options).await.unwrap();

    assert!(!refreshed.from_cache());
    assert_eq!(fresh.reader().state_calls(), 2);
    assert_eq!(refreshed.records()[1].utilization_rate, 50.0);

    let cached = DiskCache::new(&path).load(range).await.unwrap();
    assert_eq!(cached, refreshed.records());
}

#[tokio::test]
async fn test_empty_result_is_not_cached() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cache.json");
    let collector = collector(MockMarketReader::new(1_000), Box::new(DiskCache::new(&path)));

    let history = collector
        .collect(BlockRange::new(100, 200).unwrap(), CollectOptions::default())
        .await
        .unwrap();

    assert!(history.is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_range_beyond_chain_tip_is_rejected() {
    let collector = collector(
        MockMarketReader::new(250).with_linear_market(&[100, 200, 300]),
        Box::new(NoOpCache),
    );

    let result = collector
        .collect(BlockRange::new(100, 300).unwrap(), CollectOptions::default())
        .await;

    match result {
        Err(HistoryError::BeyondChainTip {
            end_block,
            latest_block,
        }) => {
            assert_eq!(end_block, 300);
            assert_eq!(latest_block, 250);
        }
        other => panic!("expected BeyondChainTip, got {other:?}"),
    }
    assert_eq!(collector.reader().state_calls(), 0);
}
