//! Shared helpers for the integration tests

#![allow(dead_code)]

use async_flow::{Done, Task};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Route `tracing` output to the test harness; `RUST_LOG` picks the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Ordered log of events shared between tasks
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Main callback that forwards its arguments to a oneshot, plus the receiver
pub fn outcome<R, E>() -> (
    impl FnOnce(Option<E>, R) + Send + 'static,
    oneshot::Receiver<(Option<E>, R)>,
)
where
    R: Send + 'static,
    E: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    (
        move |error, value| {
            sender.send((error, value)).ok();
        },
        receiver,
    )
}

/// Task that reports `value` after `delay`, noting start and finish in `journal`
pub fn delayed<E>(journal: &Journal, label: &'static str, delay: Duration, value: u32) -> Task<u32, E>
where
    E: Send + 'static,
{
    let journal = journal.clone();
    Box::new(move |done: Done<u32, E>| {
        journal.push(format!("start {label}"));
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            journal.push(format!("finish {label}"));
            done.ok(value);
        });
    })
}
