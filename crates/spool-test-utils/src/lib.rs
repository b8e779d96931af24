//! Test utilities and mock collaborators for Spool development.
//!
//! Provides a [`RecordingFactory`] whose handles log every archive call
//! instead of writing a file, and a [`MockContext`] with a settable
//! step counter and a fixed rank count.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod archive;

pub use archive::{ArchiveCall, RecordingFactory, RecordingHandle};

use std::sync::atomic::{AtomicU64, Ordering};

use spool_dump::SimulationContext;

/// Simulation context backed by an atomic step counter.
///
/// Pass `&MockContext` to the scheduler and keep the original to move
/// the step forward during a test.
pub struct MockContext {
    step: AtomicU64,
    ranks: u32,
}

impl MockContext {
    pub fn new(step: u64, ranks: u32) -> Self {
        Self {
            step: AtomicU64::new(step),
            ranks,
        }
    }

    /// Single-rank context at step 0.
    pub fn single_rank() -> Self {
        Self::new(0, 1)
    }

    pub fn set_step(&self, step: u64) {
        self.step.store(step, Ordering::Relaxed);
    }

    pub fn advance(&self, steps: u64) {
        self.step.fetch_add(steps, Ordering::Relaxed);
    }
}

impl Default for MockContext {
    fn default() -> Self {
        Self::single_rank()
    }
}

impl SimulationContext for MockContext {
    fn current_step(&self) -> u64 {
        self.step.load(Ordering::Relaxed)
    }

    fn rank_count(&self) -> u32 {
        self.ranks
    }
}
