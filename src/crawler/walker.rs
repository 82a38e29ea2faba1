//! Depth-first tree walker
//!
//! Per node the walker:
//! 1. Fetches the record (a failure ends the branch)
//! 2. Saves it (a failure is logged, the branch continues)
//! 3. Descends into the children in listing order
//! 4. Pauses the throttle once the whole subtree is done (post-order)
//!
//! Traversal uses an explicit stack so tree depth is bounded by memory, not
//! by the call stack.

use crate::catalog::{Catalog, Code};
use crate::crawler::scheduler::Throttle;
use crate::storage::RecordStore;
use std::collections::HashSet;
use std::time::Instant;

/// How often progress is logged, in visited nodes
const PROGRESS_INTERVAL: u64 = 100;

/// Traversal options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Skip codes already visited during this run
    ///
    /// Off by default: a code reachable from several parents is fetched and
    /// saved once per parent.
    pub dedupe: bool,
}

/// Counters for one walker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub nodes_visited: u64,
    pub fetch_failures: u64,
    pub records_saved: u64,
    pub save_failures: u64,
    pub duplicates_skipped: u64,
}

enum Frame {
    /// Fetch, save and expand this code
    Visit(Code),
    /// The subtree below this code is complete
    Finish(Code),
}

/// Walks catalog subtrees into a record store
pub struct Walker<C, S, T> {
    catalog: C,
    store: S,
    throttle: T,
    options: WalkOptions,
    visited: HashSet<Code>,
    stats: WalkStats,
    started: Instant,
}

impl<C, S, T> Walker<C, S, T>
where
    C: Catalog,
    S: RecordStore,
    T: Throttle,
{
    pub fn new(catalog: C, store: S, throttle: T, options: WalkOptions) -> Self {
        Self {
            catalog,
            store,
            throttle,
            options,
            visited: HashSet::new(),
            stats: WalkStats::default(),
            started: Instant::now(),
        }
    }

    /// Visits `root` and everything below it
    ///
    /// Never fails: fetch and save errors are logged and counted.
    pub async fn walk(&mut self, root: Code) {
        let mut stack = vec![Frame::Visit(root)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Visit(code) => self.visit(code, &mut stack).await,
                Frame::Finish(code) => self.throttle.pause(&code).await,
            }
        }
    }

    async fn visit(&mut self, code: Code, stack: &mut Vec<Frame>) {
        if self.options.dedupe && !self.visited.insert(code.clone()) {
            tracing::debug!("Skipping already visited code {}", code);
            self.stats.duplicates_skipped += 1;
            return;
        }

        tracing::info!("Fetching data for ICD-10 code: {}", code);
        self.stats.nodes_visited += 1;
        self.report_progress(stack.len());

        let record = match self.catalog.fetch(&code).await {
            Ok(record) => record,
            Err(e) => {
                // Children are only known from a successful payload
                tracing::debug!("Skipping children of '{}': {}", code, e.cause);
                self.stats.fetch_failures += 1;
                self.throttle.pause(&code).await;
                return;
            }
        };

        match self.store.save(&code, &record) {
            Ok(_) => self.stats.records_saved += 1,
            Err(e) => {
                tracing::error!("{}", e);
                self.stats.save_failures += 1;
            }
        }

        stack.push(Frame::Finish(code));
        if let Some(children) = record.child_codes() {
            stack.extend(children.into_iter().rev().map(Frame::Visit));
        }
    }

    fn report_progress(&self, pending: usize) {
        if self.stats.nodes_visited % PROGRESS_INTERVAL != 0 {
            return;
        }

        let elapsed = self.started.elapsed();
        let rate = self.stats.nodes_visited as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        tracing::info!(
            "Progress: {} nodes visited, {} frames pending, {:.2} nodes/sec",
            self.stats.nodes_visited,
            pending,
            rate
        );
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    pub fn options(&self) -> WalkOptions {
        self.options
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn throttle(&self) -> &T {
        &self.throttle
    }
}
