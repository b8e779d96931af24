//! The dump scheduler: owns one open archive for the life of a dump job.
//!
//! [`DumpScheduler::open`] runs the whole admission sequence:
//!
//! 1. expand and validate the requests into a [`DumpSpec`];
//! 2. parse the mode token, downgrading `Append` to `Overwrite` when the
//!    target file does not exist;
//! 3. open the archive handle at the current simulation step;
//! 4. register every static property (constant, step 0), then every
//!    `(dynamic property, period)` pair, rejecting rank-unsafe
//!    properties when more than one rank participates.
//!
//! If step 4 fails the handle is closed before the error is returned,
//! so a failed construction never leaves an archive open.

use std::path::{Path, PathBuf};

use serde::Serialize;
use spool_core::{PropertyRequest, ResolvedProperty};

use crate::archive::{ArchiveFactory, ArchiveHandle, RecordStep, Registration};
use crate::config::DumpConfig;
use crate::context::SimulationContext;
use crate::error::DumpError;
use crate::mode::DumpMode;
use crate::record;
use crate::spec::{DumpSpec, Periods};

/// An open dump job.
///
/// The archive handle is never exposed; every write goes through the
/// scheduler. [`close`](Self::close) consumes the scheduler, so there
/// is no way to use it afterwards. Dropping an open scheduler closes
/// the handle and logs any failure.
///
/// # Examples
///
/// ```
/// use spool_dump::{DumpConfig, DumpScheduler};
/// use spool_test_utils::{MockContext, RecordingFactory};
///
/// let factory = RecordingFactory::new();
/// let context = MockContext::new(0, 1);
///
/// let config = DumpConfig::new("traj.zip")
///     .with_static("viz_static")
///     .with_dynamic("position", 100);
/// let mut dump = DumpScheduler::open(config, &factory, &context).unwrap();
/// assert_eq!(dump.registrations(), 4);
///
/// context.set_step(100);
/// dump.write_metadata_record("params.json", &[1.0, 2.0], true).unwrap();
/// dump.close().unwrap();
///
/// assert_eq!(factory.registrations().len(), 4);
/// assert!(factory.is_closed());
/// ```
pub struct DumpScheduler<H: ArchiveHandle, C: SimulationContext> {
    path: PathBuf,
    mode: DumpMode,
    spec: DumpSpec,
    context: C,
    handle: H,
    registrations: usize,
    closed: bool,
}

impl<H: ArchiveHandle, C: SimulationContext> DumpScheduler<H, C> {
    /// Resolve `config`, open its archive through `factory`, and
    /// register every property.
    pub fn open<F>(config: DumpConfig, factory: &F, context: C) -> Result<Self, DumpError>
    where
        F: ArchiveFactory<Handle = H>,
    {
        let spec = config.resolve()?;
        let mode = config.parsed_mode()?.effective_for(&config.path);
        let start_step = context.current_step();

        let mut handle = factory.open(&config.path, mode, start_step)?;
        tracing::info!(
            path = %config.path.display(),
            %mode,
            start_step,
            "opened dump archive"
        );

        let registrations = match register_all(&mut handle, &spec, context.rank_count()) {
            Ok(n) => n,
            Err(e) => {
                if let Err(close_err) = handle.close() {
                    tracing::warn!(
                        path = %config.path.display(),
                        error = %close_err,
                        "failed to close archive after aborted registration"
                    );
                }
                return Err(e);
            }
        };

        Ok(Self {
            path: config.path,
            mode,
            spec,
            context,
            handle,
            registrations,
            closed: false,
        })
    }

    /// Effective mode, after the `Append` fallback.
    pub fn mode(&self) -> DumpMode {
        self.mode
    }

    /// Target archive path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The resolved job.
    pub fn spec(&self) -> &DumpSpec {
        &self.spec
    }

    /// Number of registration calls made on the archive.
    pub fn registrations(&self) -> usize {
        self.registrations
    }

    /// How often the simulation should call [`analyze`](Self::analyze).
    pub fn analyzer_period(&self) -> u64 {
        self.handle.current_aggregate_period()
    }

    /// Run one write cycle at `step`.
    pub fn analyze(&mut self, step: u64) -> Result<(), DumpError> {
        self.handle.flush(step)?;
        Ok(())
    }

    /// Encode `value` and write it as the text record `name`.
    ///
    /// With `dynamic` the record is tagged with the current simulation
    /// step; otherwise it is a static record. An encoding failure
    /// rejects only this record.
    pub fn write_metadata_record<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        value: &T,
        dynamic: bool,
    ) -> Result<(), DumpError> {
        let text = record::encode(name, value)?;
        let step = if dynamic {
            RecordStep::At(self.context.current_step())
        } else {
            RecordStep::Static
        };
        self.handle.write_text_record(name, &text, step)?;
        tracing::debug!(
            record = name,
            step = step.raw(),
            bytes = text.len(),
            "wrote metadata record"
        );
        Ok(())
    }

    /// Finalize and close the archive.
    pub fn close(mut self) -> Result<(), DumpError> {
        self.closed = true;
        self.handle.close()?;
        tracing::info!(path = %self.path.display(), "closed dump archive");
        Ok(())
    }
}

impl<H: ArchiveHandle, C: SimulationContext> Drop for DumpScheduler<H, C> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.handle.close() {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to close dump archive on drop"
            );
        }
    }
}

fn check_rank_safety(property: &ResolvedProperty, rank_count: u32) -> Result<(), DumpError> {
    if rank_count > 1 && property.is_rank_unsafe() {
        return Err(DumpError::RankUnsafeProperty {
            property: property.name().to_string(),
            rank_count,
        });
    }
    Ok(())
}

fn register<H: ArchiveHandle>(
    handle: &mut H,
    registration: Registration,
    property: &ResolvedProperty,
) -> Result<(), DumpError> {
    handle.register_property(&registration)?;
    tracing::debug!(
        property = property.name(),
        behavior = %registration.behavior,
        period = registration.period,
        high_precision = registration.high_precision,
        compression = %registration.compression,
        "registered dump property"
    );
    Ok(())
}

fn register_all<H: ArchiveHandle>(
    handle: &mut H,
    spec: &DumpSpec,
    rank_count: u32,
) -> Result<usize, DumpError> {
    let mut count = 0;
    for property in spec.static_properties() {
        check_rank_safety(property, rank_count)?;
        register(handle, Registration::constant(property), property)?;
        count += 1;
    }
    for (property, periods) in spec.dynamic_properties() {
        for &period in periods {
            check_rank_safety(property, rank_count)?;
            register(handle, Registration::discrete(property, period), property)?;
            count += 1;
        }
    }
    Ok(count)
}

/// Dump `static_properties` and `dynamic_properties` once, right now.
///
/// Opens `path` in overwrite mode, registers the dynamic names at
/// period 1, runs a single write cycle at the current step, and closes
/// the archive.
pub fn dump_immediate<F, C>(
    path: impl Into<PathBuf>,
    static_properties: &[PropertyRequest],
    dynamic_properties: &[PropertyRequest],
    factory: &F,
    context: C,
) -> Result<(), DumpError>
where
    F: ArchiveFactory,
    C: SimulationContext,
{
    let config = DumpConfig {
        path: path.into(),
        mode: DumpMode::Overwrite.token().to_string(),
        static_properties: static_properties.to_vec(),
        dynamic_properties: dynamic_properties
            .iter()
            .map(|request| (request.clone(), Periods::from(1)))
            .collect(),
    };
    let mut scheduler = DumpScheduler::open(config, factory, context)?;
    let step = scheduler.context.current_step();
    scheduler.analyze(step)?;
    scheduler.close()
}
