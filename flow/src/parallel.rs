//! Concurrent fan-out with positional fan-in

use crate::config::Flow;
use crate::lock;
use crate::signal::{Done, Task};
use std::sync::{Arc, Mutex};

struct ParallelState<T, F> {
    slots: Vec<Option<T>>,
    completed: usize,
    callback: Option<F>,
}

struct ParallelRun<T, F> {
    name: Arc<str>,
    total: usize,
    state: Mutex<ParallelState<T, F>>,
}

impl Flow {
    /// Launch every task immediately and collect their values by position
    ///
    /// Slot `i` of the results holds the value task `i` reported, whatever
    /// order the tasks finish in. The main callback fires exactly once: on
    /// the first reported error, or when the last task reports success.
    /// An error does not stop tasks that were already launched, and all of
    /// them are launched before this call returns. An empty list calls
    /// `callback(None, vec![])` before returning.
    pub fn parallel<T, E, F>(&self, tasks: Vec<Task<T, E>>, callback: F)
    where
        T: Send + 'static,
        E: Send + 'static,
        F: FnOnce(Option<E>, Vec<Option<T>>) + Send + 'static,
    {
        if tasks.is_empty() {
            tracing::debug!(flow = self.name(), "parallel run with no tasks");
            callback(None, Vec::new());
            return;
        }

        let total = tasks.len();
        tracing::debug!(flow = self.name(), tasks = total, "parallel run started");

        let run = Arc::new(ParallelRun {
            name: self.shared_name(),
            total,
            state: Mutex::new(ParallelState {
                slots: std::iter::repeat_with(|| None).take(total).collect(),
                completed: 0,
                callback: Some(callback),
            }),
        });

        let watch = self.watch();
        for (index, task) in tasks.into_iter().enumerate() {
            let owner = Arc::clone(&run);
            task(Done::watched(watch.clone(), move |error, value| {
                settle(&owner, index, error, value);
            }));
        }
    }
}

fn settle<T, E, F>(run: &ParallelRun<T, F>, index: usize, error: Option<E>, value: Option<T>)
where
    F: FnOnce(Option<E>, Vec<Option<T>>),
{
    let mut state = lock(&run.state);
    state.completed += 1;

    if state.callback.is_none() {
        tracing::trace!(
            flow = &*run.name,
            index,
            failed = error.is_some(),
            "parallel task completed after run finished"
        );
        return;
    }

    tracing::trace!(
        flow = &*run.name,
        index,
        failed = error.is_some(),
        "parallel task completed"
    );
    if let Some(slot) = state.slots.get_mut(index) {
        *slot = value;
    }
    if error.is_none() && state.completed < run.total {
        return;
    }

    let callback = state.callback.take();
    let results = std::mem::take(&mut state.slots);
    let completed = state.completed;
    drop(state);

    if let Some(callback) = callback {
        tracing::debug!(
            flow = &*run.name,
            completed,
            total = run.total,
            failed = error.is_some(),
            "parallel run finished"
        );
        callback(error, results);
    }
}
