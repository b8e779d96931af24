//! Dump job configuration.
//!
//! [`DumpConfig`] is the builder input for a dump job. It holds the
//! caller's requests exactly as given; [`resolve()`](DumpConfig::resolve)
//! expands and validates them into a [`DumpSpec`].

use std::path::PathBuf;

use spool_core::PropertyRequest;

use crate::error::DumpError;
use crate::mode::DumpMode;
use crate::spec::{DumpSpec, Periods};

/// What to dump, where, and how often.
///
/// # Examples
///
/// ```
/// use spool_core::PropertyRequest;
/// use spool_dump::DumpConfig;
///
/// let config = DumpConfig::new("traj.zip")
///     .with_mode("append")
///     .with_static("viz_static")
///     .with_dynamic("position", 100)
///     .with_dynamic(PropertyRequest::new("velocity").with_high_precision(true), [100, 1000]);
///
/// let spec = config.resolve().unwrap();
/// assert_eq!(spec.static_len(), 3);
/// assert_eq!(spec.registration_count(), 6);
/// ```
#[derive(Clone, Debug)]
pub struct DumpConfig {
    /// Target archive path.
    pub path: PathBuf,
    /// Mode token: `"overwrite"`, `"append"`, or `"one-shot"`
    /// (or `"w"`, `"a"`, `"1"`). Default: `"overwrite"`.
    pub mode: String,
    /// Properties written once at job start.
    pub static_properties: Vec<PropertyRequest>,
    /// Properties written periodically, with their periods.
    pub dynamic_properties: Vec<(PropertyRequest, Periods)>,
}

impl DumpConfig {
    /// An empty overwrite-mode job targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: DumpMode::default().token().to_string(),
            static_properties: Vec::new(),
            dynamic_properties: Vec::new(),
        }
    }

    /// A job that dumps every name in `dynamic` at one shared `period`.
    ///
    /// Every dynamic request gets `high_precision` and the default
    /// compression. Static properties and the mode can be added with
    /// the usual builder methods.
    pub fn simple<I, S>(
        path: impl Into<PathBuf>,
        period: i64,
        dynamic: I,
        high_precision: bool,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::new(path);
        config.dynamic_properties = dynamic
            .into_iter()
            .map(|name| {
                (
                    PropertyRequest::new(name).with_high_precision(high_precision),
                    Periods::from(period),
                )
            })
            .collect();
        config
    }

    /// Set the mode token.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Add a static request.
    pub fn with_static(mut self, request: impl Into<PropertyRequest>) -> Self {
        self.static_properties.push(request.into());
        self
    }

    /// Add a dynamic request at one or more periods.
    pub fn with_dynamic(
        mut self,
        request: impl Into<PropertyRequest>,
        periods: impl Into<Periods>,
    ) -> Self {
        self.dynamic_properties.push((request.into(), periods.into()));
        self
    }

    /// Parse the mode token.
    pub fn parsed_mode(&self) -> Result<DumpMode, DumpError> {
        self.mode.parse()
    }

    /// Expand and validate the requests.
    pub fn resolve(&self) -> Result<DumpSpec, DumpError> {
        DumpSpec::build(&self.static_properties, &self.dynamic_properties)
    }
}
