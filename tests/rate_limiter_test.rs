//! Integration tests for request pacing.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use probe_core::error::EngineError;
use probe_core::scheduler::RateLimiter;

// === Construction ===

#[test]
fn zero_rate_is_an_invalid_configuration() {
    match RateLimiter::new(0) {
        Err(EngineError::InvalidConfiguration { field, reason }) => {
            assert_eq!(field, "max_requests_per_minute");
            assert_eq!(reason, "maxRequestsPerMinute must be > 0");
        }
        other => panic!("expected InvalidConfiguration, got {:?}", other.map(|l| l.interval())),
    }
}

// === Pacing ===

#[tokio::test]
async fn three_permits_at_600_per_minute_take_two_intervals() {
    let limiter = RateLimiter::new(600).unwrap();
    let start = Instant::now();
    for _ in 0..3 {
        limiter.acquire().await;
    }
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200), "too fast: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(350), "too slow: {:?}", elapsed);
}

#[test]
fn blocking_permits_follow_the_same_interval() {
    let limiter = RateLimiter::new(600).unwrap();
    let start = Instant::now();
    assert_eq!(limiter.blocking_acquire(), Duration::ZERO);
    limiter.blocking_acquire();
    limiter.blocking_acquire();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(350));
}

#[test]
fn first_permit_never_blocks() {
    let limiter = RateLimiter::new(1).unwrap();
    let start = Instant::now();
    tokio_test::block_on(limiter.acquire());
    assert!(start.elapsed() < Duration::from_millis(50));
}

#[test]
fn idle_time_counts_towards_the_interval() {
    let limiter = RateLimiter::new(600).unwrap();
    limiter.blocking_acquire();
    thread::sleep(Duration::from_millis(150));
    let start = Instant::now();
    limiter.blocking_acquire();
    assert!(start.elapsed() < Duration::from_millis(50));
}

// === Concurrency ===

#[test]
fn concurrent_threads_share_one_budget() {
    let limiter = Arc::new(RateLimiter::new(1200).unwrap());
    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            thread::spawn(move || {
                for _ in 0..2 {
                    limiter.blocking_acquire();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    // Eight permits, 50ms apart: at least seven intervals.
    assert!(start.elapsed() >= Duration::from_millis(350));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tasks_share_one_budget() {
    let limiter = Arc::new(RateLimiter::new(1200).unwrap());
    let start = Instant::now();
    let tasks: Vec<_> = (0..6)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move { limiter.acquire().await })
        })
        .collect();
    let mut waited = Duration::ZERO;
    for task in tasks {
        waited += task.await.unwrap();
    }
    assert!(start.elapsed() >= Duration::from_millis(250));
    assert!(waited > Duration::ZERO);
}
