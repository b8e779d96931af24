//! Spool: periodic trajectory and checkpoint dump scheduling for particle
//! simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Spool sub-crates. Bring your own archive writer by implementing
//! [`dump::ArchiveFactory`] and [`dump::ArchiveHandle`], and your
//! simulation's step counter and rank count through
//! [`dump::SimulationContext`].
//!
//! # Quick start
//!
//! ```rust
//! use spool::prelude::*;
//! use spool_test_utils::{MockContext, RecordingFactory};
//!
//! let factory = RecordingFactory::new();
//! let context = MockContext::new(0, 1);
//!
//! // Topology once, positions and box every 1000 steps.
//! let config = DumpConfig::simple("traj.zip", 1000, ["viz_dynamic"], false)
//!     .with_static("viz_static");
//! let mut dump = DumpScheduler::open(config, &factory, &context).unwrap();
//! assert_eq!(dump.registrations(), 5);
//! assert_eq!(dump.analyzer_period(), 1000);
//!
//! dump.analyze(0).unwrap();
//! dump.close().unwrap();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `spool-core` | Property catalog, group table, property requests |
//! | [`dump`] | `spool-dump` | Dump jobs, modes, archive traits, the scheduler |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Property catalog and group expansion (`spool-core`).
///
/// [`core::PropertyCatalog::standard`] and [`core::GroupTable::standard`]
/// hold the fixed tables every dump job resolves against.
pub use spool_core as core;

/// Dump job resolution and scheduling (`spool-dump`).
///
/// Build a [`dump::DumpConfig`], open it with [`dump::DumpScheduler::open`],
/// or write a one-off snapshot with [`dump::dump_immediate`].
pub use spool_dump as dump;

/// Common imports for typical Spool usage.
///
/// ```rust
/// use spool::prelude::*;
/// ```
pub mod prelude {
    // Properties
    pub use spool_core::{Compression, PropertyCatalog, PropertyRequest};

    // Jobs
    pub use spool_dump::{dump_immediate, DumpConfig, DumpMode, DumpScheduler};

    // Collaborators
    pub use spool_dump::{ArchiveFactory, ArchiveHandle, SimulationContext};

    // Errors
    pub use spool_dump::DumpError;
}
