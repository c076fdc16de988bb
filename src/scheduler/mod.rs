// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Running one search on several threads.
//!
//! The [`WorkScheduler`] expands the search tree breadth-first from the root
//! until there are enough subtrees to keep every thread busy, freezes each
//! subtree at its root, and lets worker threads pull them from a shared queue.
//! Every worker runs the ordinary sequential engine on its own
//! [`SearchContext`]; only the MEMO data is shared.
//!
//! With one thread nothing is split and the engine runs on the caller's
//! thread, which keeps the emission order deterministic.
//!
//! A panicking worker raises the halt flag so its siblings stop at their next
//! step; the panic is reported as [`SimsError::InternalInconsistency`].

mod stream;

pub use stream::Stream;

use std::any::Any;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use log::debug;

use crate::context::{MemoizedData, SearchContext};
use crate::engine::{EngineBuilder, SearchEngine};
use crate::error::{Result, SimsError};
use crate::graph::ActionGraph;
use crate::predicates::{
    AcceptPredicate, DefineEdgePredicate, FailPredicate, InitializePredicate, SuspendPredicate,
};
use crate::state::{Counters, Statistics};

/// Subtrees created per worker thread, so that uneven subtrees even out.
const SUBTREES_PER_THREAD: usize = 4;

/// The frontier is never expanded deeper than this.
const MAX_SPLIT_DEPTH: usize = 64;

/// Solutions buffered between the workers and the consumer.
const CHANNEL_CAPACITY: usize = 256;

/// The search program that suspends on every solution.
pub(crate) fn suspending_program() -> SearchEngine {
    EngineBuilder::new()
        .add(Box::new(InitializePredicate))
        .add(Box::new(DefineEdgePredicate::new()))
        .add(Box::new(AcceptPredicate))
        .terminal(Box::new(SuspendPredicate))
        .build()
}

/// The search program that only counts solutions, in the statistics.
pub(crate) fn counting_program() -> SearchEngine {
    EngineBuilder::new()
        .add(Box::new(InitializePredicate))
        .add(Box::new(DefineEdgePredicate::new()))
        .add(Box::new(AcceptPredicate))
        .terminal(Box::new(FailPredicate))
        .build()
}

/// Call `f` on every solution below `ctx`, stopping early when it returns `false`.
///
/// Returns `false` if stopped by `f`.
pub(crate) fn visit_solutions(
    ctx: &mut SearchContext,
    halt: Option<Arc<AtomicBool>>,
    mut f: impl FnMut(&ActionGraph) -> bool,
) -> bool {
    let mut program = suspending_program();
    if let Some(flag) = halt {
        program = program.with_halt(flag);
    }
    let mut engine = Some(program);
    while let Some(e) = engine.take() {
        engine = e.search(ctx);
        if engine.is_some() && !f(ctx.graph()) {
            return false;
        }
    }
    true
}

/// Raises the halt flag if the owning thread unwinds.
struct HaltOnPanic<'a>(&'a AtomicBool);

impl Drop for HaltOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::Relaxed);
        }
    }
}

fn next_subtree(queue: &Mutex<VecDeque<SearchContext>>) -> Option<SearchContext> {
    match queue.lock() {
        Ok(mut subtrees) => subtrees.pop_front(),
        Err(_) => None,
    }
}

/// Worker body: run `visit` on subtrees until the queue is empty, the
/// search is halted, or `visit` returns `false`.
fn drain_queue(
    queue: &Mutex<VecDeque<SearchContext>>,
    halt: &AtomicBool,
    mut visit: impl FnMut(&mut SearchContext) -> bool,
) -> Statistics {
    let _guard = HaltOnPanic(halt);
    let mut statistics = Statistics::new();
    while !halt.load(Ordering::Relaxed) {
        let Some(mut ctx) = next_subtree(queue) else {
            break;
        };
        let keep_going = visit(&mut ctx);
        statistics.absorb(&ctx.statistics);
        if !keep_going {
            break;
        }
    }
    statistics
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("worker thread panicked")
    }
}

/// Merge worker statistics, turning a worker panic into an error.
fn merge(
    mut statistics: Statistics,
    results: Vec<thread::Result<Statistics>>,
) -> Result<Statistics> {
    let mut failure = None;
    for result in results {
        match result {
            Ok(worker) => statistics.absorb(&worker),
            Err(payload) => {
                failure.get_or_insert_with(|| panic_message(payload.as_ref()));
            }
        }
    }
    match failure {
        Some(message) => Err(SimsError::InternalInconsistency(message)),
        None => Ok(statistics),
    }
}

/// Fans one search out over a fixed number of threads.
#[derive(Debug, Clone)]
pub struct WorkScheduler {
    memo: Arc<MemoizedData>,
    threads: usize,
}

impl WorkScheduler {
    pub fn new(memo: Arc<MemoizedData>, threads: usize) -> Self {
        Self {
            memo,
            threads: threads.max(1),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// A fresh context at the root of the search tree.
    pub fn root(&self) -> SearchContext {
        SearchContext::new(Arc::clone(&self.memo))
    }

    /// Expand the search tree breadth-first until at least `target`
    /// subtrees exist, no subtree can be expanded, or the depth limit is hit.
    ///
    /// Subtrees come back in left-to-right order with their trails frozen,
    /// together with the statistics of the expansion itself.
    pub fn split(&self, target: usize) -> (VecDeque<SearchContext>, Statistics) {
        let mut statistics = Statistics::new();
        let mut frontier = VecDeque::new();

        let mut root = self.root();
        let alive = match root.initialize() {
            Ok(()) => root.pruners_accept(),
            Err(failure) => {
                root.statistics.record_failure(&failure);
                false
            }
        };
        if !alive {
            statistics.absorb(&root.statistics);
            return (frontier, statistics);
        }
        frontier.push_back(root);

        for depth in 0..MAX_SPLIT_DEPTH {
            if frontier.len() >= target {
                break;
            }
            let mut expanded = false;
            let mut next = VecDeque::with_capacity(frontier.len() * 2);
            for ctx in frontier {
                let Some((node, letter)) = ctx.graph().next_undefined_from(0, 0) else {
                    next.push_back(ctx);
                    continue;
                };
                expanded = true;
                for choice in 0..ctx.number_of_candidates() {
                    let mut child = ctx.clone();
                    child.statistics = Statistics::new();
                    child.statistics.increment(Counters::Choices);
                    let candidate = child.candidate(choice);
                    let alive = match child.try_define(node, letter, candidate) {
                        Ok(()) => child.pruners_accept(),
                        Err(failure) => {
                            child.statistics.record_failure(&failure);
                            false
                        }
                    };
                    if alive {
                        next.push_back(child);
                    } else {
                        statistics.absorb(&child.statistics);
                    }
                }
                statistics.absorb(&ctx.statistics);
            }
            frontier = next;
            if !expanded {
                break;
            }
            debug!("Split depth {}: {} subtrees", depth + 1, frontier.len());
        }

        for ctx in frontier.iter_mut() {
            ctx.trail.freeze();
        }
        (frontier, statistics)
    }

    fn split_for_workers(&self) -> (Mutex<VecDeque<SearchContext>>, Statistics) {
        let (subtrees, statistics) = self.split(SUBTREES_PER_THREAD * self.threads);
        debug!(
            "{} subtrees for {} threads",
            subtrees.len(),
            self.threads
        );
        (Mutex::new(subtrees), statistics)
    }

    /// Number of solutions.
    pub fn count(&self) -> Result<u64> {
        if self.threads == 1 {
            let mut ctx = self.root();
            let _ = counting_program().search(&mut ctx);
            debug!("Search finished: {}", ctx.statistics);
            return Ok(ctx.statistics.get(Counters::Solutions));
        }

        let (queue, statistics) = self.split_for_workers();
        let halt = Arc::new(AtomicBool::new(false));
        let results = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.threads)
                .map(|_| {
                    let queue = &queue;
                    let halt = &halt;
                    scope.spawn(move || {
                        drain_queue(queue, halt, |ctx| {
                            let _ = counting_program()
                                .with_halt(Arc::clone(halt))
                                .search(ctx);
                            true
                        })
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
        });
        let statistics = merge(statistics, results)?;
        debug!("Search finished: {}", statistics);
        Ok(statistics.get(Counters::Solutions))
    }

    /// Call `visitor` on every solution, on the calling thread.
    pub fn for_each<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&ActionGraph),
    {
        if self.threads == 1 {
            let mut ctx = self.root();
            visit_solutions(&mut ctx, None, |graph| {
                visitor(graph);
                true
            });
            debug!("Search finished: {}", ctx.statistics);
            return Ok(());
        }

        let (queue, statistics) = self.split_for_workers();
        let halt = Arc::new(AtomicBool::new(false));
        let results = thread::scope(|scope| {
            let (sender, receiver) = mpsc::sync_channel::<ActionGraph>(CHANNEL_CAPACITY);
            let handles: Vec<_> = (0..self.threads)
                .map(|_| {
                    let sender = sender.clone();
                    let queue = &queue;
                    let halt = &halt;
                    scope.spawn(move || {
                        drain_queue(queue, halt, |ctx| {
                            visit_solutions(ctx, Some(Arc::clone(halt)), |graph| {
                                sender.send(graph.clone()).is_ok()
                            })
                        })
                    })
                })
                .collect();
            drop(sender);
            for graph in receiver {
                visitor(&graph);
            }
            handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
        });
        let statistics = merge(statistics, results)?;
        debug!("Search finished: {}", statistics);
        Ok(())
    }

    /// Some solution satisfying `predicate`, or `None`.
    ///
    /// With one thread this is the first such solution in emission order.
    pub fn find_first<F>(&self, predicate: F) -> Result<Option<ActionGraph>>
    where
        F: Fn(&ActionGraph) -> bool + Sync,
    {
        if self.threads == 1 {
            let mut ctx = self.root();
            let mut found = None;
            visit_solutions(&mut ctx, None, |graph| {
                if predicate(graph) {
                    found = Some(graph.clone());
                    false
                } else {
                    true
                }
            });
            debug!("Search finished: {}", ctx.statistics);
            return Ok(found);
        }

        let (queue, statistics) = self.split_for_workers();
        let halt = Arc::new(AtomicBool::new(false));
        let found: Mutex<Option<ActionGraph>> = Mutex::new(None);
        let results = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.threads)
                .map(|_| {
                    let queue = &queue;
                    let halt = &halt;
                    let found = &found;
                    let predicate = &predicate;
                    scope.spawn(move || {
                        drain_queue(queue, halt, |ctx| {
                            visit_solutions(ctx, Some(Arc::clone(halt)), |graph| {
                                if !predicate(graph) {
                                    return true;
                                }
                                if let Ok(mut slot) = found.lock() {
                                    slot.get_or_insert_with(|| graph.clone());
                                }
                                halt.store(true, Ordering::Relaxed);
                                false
                            })
                        })
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
        });
        let statistics = merge(statistics, results)?;
        debug!("Search finished: {}", statistics);
        found
            .into_inner()
            .map_err(|_| SimsError::InternalInconsistency("result slot poisoned".into()))
    }

    /// A lazy stream of solutions produced by background threads.
    pub fn stream(&self) -> Stream {
        Stream::spawn(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SearchSettings;
    use crate::presentation::Presentation;

    fn scheduler(threads: usize) -> WorkScheduler {
        let p = Presentation::new(2)
            .contains_empty_word(true)
            .rule(&[0, 0, 0], &[0])
            .rule(&[1, 1], &[1])
            .rule(&[0, 1, 0, 1], &[0]);
        let memo = MemoizedData::new(p, &SearchSettings::default(), 5);
        WorkScheduler::new(Arc::new(memo), threads)
    }

    #[test]
    fn test_split_preserves_solutions() {
        let s = scheduler(2);
        let (subtrees, _) = s.split(8);
        assert!(!subtrees.is_empty());
        let mut total = 0;
        for mut ctx in subtrees {
            assert_eq!(ctx.trail.floor(), ctx.trail.len());
            visit_solutions(&mut ctx, None, |_| {
                total += 1;
                true
            });
        }
        assert_eq!(total, 6);
    }

    #[test]
    fn test_count_is_thread_invariant() {
        for threads in [1, 2, 3, 4] {
            assert_eq!(scheduler(threads).count(), Ok(6));
        }
    }

    #[test]
    fn test_for_each_and_find_first() {
        let mut seen = Vec::new();
        assert!(scheduler(4).for_each(|g| seen.push(g.clone())).is_ok());
        assert_eq!(seen.len(), 6);

        let found = scheduler(4).find_first(|g| g.number_of_nodes() == 4);
        assert_eq!(
            found,
            Ok(Some(ActionGraph::from_rows(2, &[[1, 2], [1, 1], [3, 2], [3, 3]])))
        );
        assert_eq!(scheduler(2).find_first(|g| g.number_of_nodes() == 5), Ok(None));
    }

    #[test]
    fn test_worker_panic_becomes_an_error() {
        let result = scheduler(2).find_first(|g| {
            if g.number_of_nodes() == 3 {
                panic!("boom");
            }
            false
        });
        assert_eq!(result, Err(SimsError::InternalInconsistency("boom".into())));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("lost"));
        assert_eq!(panic_message(payload.as_ref()), "lost");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "worker thread panicked");
    }
}
