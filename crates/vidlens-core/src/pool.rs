//! Bounded concurrency pool
//!
//! Runs a sequence of futures with at most `limit` in flight. All futures are
//! polled on the calling task, so the pool is cooperative: nothing runs in
//! parallel on other threads, only interleaved at await points.
//!
//! The pool never short-circuits. Every submitted future runs to completion
//! and the caller decides what a failed output means.

use std::future::Future;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;

#[derive(Debug, Clone, Copy)]
pub struct BoundedPool {
    limit: usize,
}

impl BoundedPool {
    /// A limit of 0 is treated as 1
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run every task, invoking `on_settle(index, output)` as each one
    /// completes. `index` is the task's position in submission order.
    ///
    /// Admission is a sliding window: once `limit` tasks are in flight the
    /// next task is admitted as soon as any one of them settles.
    pub async fn drive<I, Fut, F>(&self, tasks: I, mut on_settle: F)
    where
        I: IntoIterator<Item = Fut>,
        Fut: Future,
        F: FnMut(usize, Fut::Output),
    {
        let mut in_flight = FuturesUnordered::new();

        for (index, task) in tasks.into_iter().enumerate() {
            in_flight.push(async move { (index, task.await) });

            if in_flight.len() >= self.limit {
                if let Some((index, output)) = in_flight.next().await {
                    on_settle(index, output);
                }
            }
        }

        while let Some((index, output)) = in_flight.next().await {
            on_settle(index, output);
        }
    }

    /// Run every task and return outputs in submission order
    pub async fn run<I, Fut>(&self, tasks: I) -> Vec<Fut::Output>
    where
        I: IntoIterator<Item = Fut>,
        Fut: Future,
    {
        let mut slots: Vec<Option<Fut::Output>> = Vec::new();

        self.drive(tasks, |index, output| {
            if slots.len() <= index {
                slots.resize_with(index + 1, || None);
            }
            slots[index] = Some(output);
        })
        .await;

        slots.into_iter().flatten().collect()
    }
}

impl Default for BoundedPool {
    fn default() -> Self {
        Self::new(1)
    }
}
