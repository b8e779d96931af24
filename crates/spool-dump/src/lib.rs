//! Dump job resolution and scheduling for Spool trajectory archives.
//!
//! Decides which properties an archive-backed dump writes, how often,
//! at what fidelity, and under which consistency mode. The physical
//! archive encoding lives behind the [`ArchiveFactory`] /
//! [`ArchiveHandle`] traits; the simulation is reached through
//! [`SimulationContext`].
//!
//! # Architecture
//!
//! - [`DumpConfig`] collects the caller's static and dynamic requests
//! - [`DumpSpec`] is the expanded, validated, deduplicated job
//! - [`DumpScheduler`] opens the archive, registers every property,
//!   forwards write cycles, and writes metadata records
//! - [`dump_immediate`] performs a single one-off dump
//!
//! # Lifecycle
//!
//! ```text
//! DumpConfig ──resolve──▶ DumpSpec ──open──▶ DumpScheduler ──close──▶ (consumed)
//!                                              │  analyze(step)
//!                                              │  write_metadata_record(..)
//! ```
//!
//! A scheduler that is dropped without [`DumpScheduler::close`] still
//! closes its archive handle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod archive;
pub mod config;
pub mod context;
pub mod error;
pub mod mode;
pub mod record;
pub mod scheduler;
pub mod spec;

pub use archive::{ArchiveFactory, ArchiveHandle, RecordStep, Registration};
pub use config::DumpConfig;
pub use context::SimulationContext;
pub use error::{DumpError, PropertyRole};
pub use mode::DumpMode;
pub use scheduler::{dump_immediate, DumpScheduler};
pub use spec::{DumpSpec, Periods};
