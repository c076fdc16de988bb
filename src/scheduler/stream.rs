// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Solutions produced by background workers, consumed lazily.

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::graph::ActionGraph;
use crate::state::Statistics;

use super::{drain_queue, visit_solutions, WorkScheduler, CHANNEL_CAPACITY, SUBTREES_PER_THREAD};

/// Iterator over the solutions found by worker threads.
///
/// The channel between the workers and the consumer is bounded, so workers
/// run at most a few solutions ahead. Dropping the stream halts the workers
/// and waits for them.
///
/// A panic in a worker is re-raised on the consuming thread once the
/// remaining solutions have been drained.
pub struct Stream {
    receiver: Option<Receiver<ActionGraph>>,
    workers: Vec<JoinHandle<Statistics>>,
    halt: Arc<AtomicBool>,
    statistics: Statistics,
}

impl Stream {
    pub(crate) fn spawn(scheduler: &WorkScheduler) -> Self {
        let (subtrees, statistics) = scheduler.split(SUBTREES_PER_THREAD * scheduler.threads());
        debug!(
            "Streaming {} subtrees on {} threads",
            subtrees.len(),
            scheduler.threads()
        );
        let queue = Arc::new(Mutex::new(subtrees));
        let halt = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = mpsc::sync_channel(CHANNEL_CAPACITY);

        let workers = (0..scheduler.threads())
            .map(|_| {
                let queue = Arc::clone(&queue);
                let halt = Arc::clone(&halt);
                let sender = sender.clone();
                thread::spawn(move || {
                    drain_queue(&queue, &halt, |ctx| {
                        visit_solutions(ctx, Some(Arc::clone(&halt)), |graph| {
                            sender.send(graph.clone()).is_ok()
                        })
                    })
                })
            })
            .collect();

        Self {
            receiver: Some(receiver),
            workers,
            halt,
            statistics,
        }
    }

    /// Join every worker, re-raising the first panic.
    fn finish(&mut self) {
        for worker in std::mem::take(&mut self.workers) {
            match worker.join() {
                Ok(statistics) => self.statistics.absorb(&statistics),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        debug!("Search finished: {}", self.statistics);
    }
}

impl Iterator for Stream {
    type Item = ActionGraph;

    fn next(&mut self) -> Option<ActionGraph> {
        let receiver = self.receiver.as_ref()?;
        match receiver.recv() {
            Ok(graph) => Some(graph),
            Err(_) => {
                // Every sender is gone: all workers have returned or unwound.
                self.receiver = None;
                self.finish();
                None
            }
        }
    }
}

impl FusedIterator for Stream {}

impl Drop for Stream {
    fn drop(&mut self) {
        self.halt.store(true, Ordering::Relaxed);
        // Unblock workers waiting on a full channel.
        self.receiver = None;
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
