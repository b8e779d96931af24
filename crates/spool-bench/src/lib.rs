//! Benchmark profiles for the Spool dump scheduler.
//!
//! - [`viz_profile`]: the common visualisation job (static topology,
//!   positions and box every 1000 steps)
//! - [`full_profile`]: every safe property, statically and at several
//!   periods
//! - [`redundant_requests`]: `n` overlapping group requests, for
//!   measuring deduplication cost

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use spool_core::PropertyRequest;
use spool_dump::DumpConfig;

/// Static `viz_static`, dynamic `viz_aniso_dynamic` every 1000 steps.
pub fn viz_profile() -> DumpConfig {
    DumpConfig::simple("bench.zip", 1000, ["viz_aniso_dynamic"], false).with_static("viz_static")
}

/// Static `all`, dynamic `particle_all` at three periods and
/// `global_all` at high precision.
pub fn full_profile() -> DumpConfig {
    DumpConfig::new("bench.tar")
        .with_static("all")
        .with_dynamic("particle_all", [100, 1000, 10_000])
        .with_dynamic(
            PropertyRequest::new("global_all").with_high_precision(true),
            100,
        )
}

/// `n` requests cycling through overlapping group names.
pub fn redundant_requests(n: usize) -> Vec<PropertyRequest> {
    const NAMES: [&str; 5] = ["all", "viz_all", "viz_aniso_all", "particle_all", "position"];
    NAMES.iter().cycle().take(n).map(|&name| name.into()).collect()
}
