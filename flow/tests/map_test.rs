//! Map runs over timer-driven projections

mod common;

use async_flow::{map, Done, Flow, FlowConfig};
use common::{init_tracing, outcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_projection_results_keep_input_order() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let (callback, receiver) = outcome();

    map(
        vec![1u64, 2, 3],
        move |value, done: Done<u64, ()>| {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                // Larger values finish first.
                sleep(Duration::from_millis(100 / value)).await;
                done.ok(value * 2);
            });
        },
        callback,
    );

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let (error, results) = receiver.await.unwrap();
    assert!(error.is_none());
    assert_eq!(results, vec![Some(2), Some(4), Some(6)]);
}

#[tokio::test(start_paused = true)]
async fn test_error_from_one_projection() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let (callback, receiver) = outcome();

    Flow::new(FlowConfig::named("map-errors")).map(
        ["a", "b", "c"],
        move |value: &'static str, done: Done<String, String>| {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                sleep(Duration::from_millis(5)).await;
                if value == "c" {
                    done.err(format!("cannot map {value}"));
                } else {
                    done.ok(value.to_uppercase());
                }
            });
        },
        callback,
    );

    let (error, _) = receiver.await.unwrap();
    assert_eq!(error.as_deref(), Some("cannot map c"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_empty_input_never_calls_projection() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_counter = Arc::clone(&fired);

    map(
        std::iter::empty::<u8>(),
        move |_, done: Done<u8, ()>| {
            counter.fetch_add(1, Ordering::SeqCst);
            done.empty();
        },
        move |error, results| {
            assert!(error.is_none());
            assert!(results.is_empty());
            fired_counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
