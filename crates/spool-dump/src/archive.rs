//! Archive writer collaborator traits.
//!
//! The byte-level container format is not defined here. A dump job
//! only needs to open a handle, tell it which properties to write and
//! how often, push text records through it, and close it.

use std::io;
use std::path::Path;

use spool_core::{Behavior, Capability, Compression, Resolution, ResolvedProperty};

use crate::mode::DumpMode;

/// One property registration passed to [`ArchiveHandle::register_property`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Registration {
    /// Writer capability to encode.
    pub capability: Capability,
    /// Resolution class of the values.
    pub resolution: Resolution,
    /// Written once, or every `period` steps.
    pub behavior: Behavior,
    /// Store at high precision.
    pub high_precision: bool,
    /// Compression level.
    pub compression: Compression,
    /// Step period. Zero for [`Behavior::Constant`].
    pub period: u64,
}

impl Registration {
    /// A write-once registration for a static property.
    pub fn constant(property: &ResolvedProperty) -> Self {
        Self::new(property, Behavior::Constant, 0)
    }

    /// A periodic registration for a dynamic property.
    pub fn discrete(property: &ResolvedProperty, period: u64) -> Self {
        Self::new(property, Behavior::Discrete, period)
    }

    fn new(property: &ResolvedProperty, behavior: Behavior, period: u64) -> Self {
        Self {
            capability: property.capability(),
            resolution: property.resolution(),
            behavior,
            high_precision: property.high_precision(),
            compression: property.compression(),
            period,
        }
    }
}

/// Step tag attached to a text record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordStep {
    /// Not tied to any step.
    Static,
    /// Written at the given simulation step.
    ///
    /// Archives store steps as signed 64-bit integers, so steps above
    /// `i64::MAX` are stored as `i64::MAX`. See [`RecordStep::raw`].
    At(u64),
}

impl RecordStep {
    /// Step number as stored in the archive; static records use `-1`.
    ///
    /// Saturates at `i64::MAX`. Distinct steps past that point share
    /// one stored value, and none of them collides with the static
    /// sentinel.
    pub fn raw(self) -> i64 {
        match self {
            Self::Static => -1,
            Self::At(step) => i64::try_from(step).unwrap_or(i64::MAX),
        }
    }
}

/// Opens archive handles.
pub trait ArchiveFactory {
    /// Handle type produced by this factory.
    type Handle: ArchiveHandle;

    /// Open the archive at `path` in `mode`, starting at `start_step`.
    ///
    /// For [`DumpMode::OneShot`] the returned handle must stage every
    /// write cycle and only replace the file at `path` once the cycle
    /// is complete.
    fn open(&self, path: &Path, mode: DumpMode, start_step: u64) -> io::Result<Self::Handle>;
}

/// An open archive, exclusively owned by one dump scheduler.
pub trait ArchiveHandle {
    /// Register a property to be written.
    fn register_property(&mut self, registration: &Registration) -> io::Result<()>;

    /// Write a named text record tagged with `step`.
    fn write_text_record(&mut self, name: &str, text: &str, step: RecordStep) -> io::Result<()>;

    /// Run one write cycle at `step`: write every registered property
    /// that is due.
    fn flush(&mut self, step: u64) -> io::Result<()>;

    /// Smallest step period that drives every registered property at
    /// its cadence.
    fn current_aggregate_period(&self) -> u64;

    /// Finalize and release the archive.
    fn close(&mut self) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use spool_core::{PropertyCatalog, PropertyRequest};

    #[test]
    fn static_records_use_minus_one() {
        assert_eq!(RecordStep::Static.raw(), -1);
        assert_eq!(RecordStep::At(0).raw(), 0);
        assert_eq!(RecordStep::At(1500).raw(), 1500);
    }

    #[test]
    fn steps_past_i64_max_saturate() {
        let max = i64::MAX as u64;
        assert_eq!(RecordStep::At(max).raw(), i64::MAX);
        assert_eq!(RecordStep::At(max + 1).raw(), i64::MAX);
        assert_eq!(RecordStep::At(u64::MAX).raw(), i64::MAX);
        assert_ne!(RecordStep::At(u64::MAX).raw(), RecordStep::Static.raw());
    }

    #[test]
    fn registration_carries_property_settings() {
        let prop = PropertyCatalog::standard()
            .resolve(
                &PropertyRequest::new("orientation")
                    .with_high_precision(true)
                    .with_compression(Compression::Medium),
            )
            .unwrap();
        let reg = Registration::discrete(&prop, 250);
        assert_eq!(reg.capability, Capability::Orientation);
        assert_eq!(reg.resolution, Resolution::Individual);
        assert_eq!(reg.behavior, Behavior::Discrete);
        assert!(reg.high_precision);
        assert_eq!(reg.compression, Compression::Medium);
        assert_eq!(reg.period, 250);

        let constant = Registration::constant(&prop);
        assert_eq!(constant.behavior, Behavior::Constant);
        assert_eq!(constant.period, 0);
    }
}
