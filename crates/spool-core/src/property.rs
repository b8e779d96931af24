//! Property identifiers, request descriptors, and resolved dump keys.

use std::fmt;

use crate::catalog::PrimitiveProperty;

/// Identifies a quantity the archive writer knows how to encode.
///
/// One variant per primitive property in the
/// [`PropertyCatalog`](crate::PropertyCatalog). The set is closed: the
/// writer has a fixed encoder per capability, so new quantities are a
/// code change, not configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Angle type name table.
    AngleNames,
    /// Per-angle endpoint tags.
    AngleTags,
    /// Per-angle type indices.
    AngleTypes,
    /// Per-particle angular momentum (quaternion conjugate momentum).
    AngularMomentum,
    /// Per-particle rigid body index.
    Body,
    /// Bond type name table.
    BondNames,
    /// Per-bond endpoint tags.
    BondTags,
    /// Per-bond type indices.
    BondTypes,
    /// Simulation box geometry (lengths and tilt factors).
    SimulationBox,
    /// Per-particle charge.
    Charge,
    /// Per-particle diameter.
    Diameter,
    /// Dihedral type name table.
    DihedralNames,
    /// Per-dihedral endpoint tags.
    DihedralTags,
    /// Per-dihedral type indices.
    DihedralTypes,
    /// System dimensionality (2 or 3).
    Dimensions,
    /// Per-particle periodic image counters.
    Image,
    /// Improper type name table.
    ImproperNames,
    /// Per-improper endpoint tags.
    ImproperTags,
    /// Per-improper type indices.
    ImproperTypes,
    /// Per-particle mass.
    Mass,
    /// Per-particle principal moments of inertia.
    MomentInertia,
    /// Per-particle orientation quaternion.
    Orientation,
    /// Per-particle position.
    Position,
    /// Per-particle potential energy. Requires a global reduction.
    PotentialEnergy,
    /// Per-particle type index.
    Type,
    /// Particle type name table.
    TypeNames,
    /// Per-particle velocity.
    Velocity,
    /// Per-particle virial. Requires a global reduction.
    Virial,
}

/// How a property's values map onto simulation entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resolution {
    /// One value for the whole system.
    Uniform,
    /// One value per entity (particle, bond, angle, ...).
    Individual,
    /// A table of strings.
    Text,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Individual => write!(f, "individual"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Compression level requested for a property's archive records.
///
/// Levels are ordered from cheapest to smallest output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Compression {
    /// Store records uncompressed.
    None,
    /// Fast compression. The default.
    #[default]
    Fast,
    /// Balanced speed and ratio.
    Medium,
    /// Slowest, best ratio.
    Slow,
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Fast => write!(f, "fast"),
            Self::Medium => write!(f, "medium"),
            Self::Slow => write!(f, "slow"),
        }
    }
}

/// Whether a registered record is written once or recurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Written once, when the dump job starts.
    Constant,
    /// Written every `period` steps.
    Discrete,
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Discrete => write!(f, "discrete"),
        }
    }
}

/// A caller-facing request to dump a property.
///
/// `name` may be a primitive property or a composite group; groups are
/// flattened by [`GroupTable::expand`](crate::GroupTable::expand), and
/// every child inherits this request's precision and compression.
///
/// # Examples
///
/// ```
/// use spool_core::{Compression, PropertyRequest};
///
/// let plain = PropertyRequest::from("position");
/// assert!(!plain.high_precision);
/// assert_eq!(plain.compression, Compression::Fast);
///
/// let precise = PropertyRequest::new("velocity")
///     .with_high_precision(true)
///     .with_compression(Compression::Slow);
/// assert_eq!(precise.name, "velocity");
/// assert!(precise.high_precision);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyRequest {
    /// Primitive or composite property name.
    pub name: String,
    /// Store values at the writer's high-precision width.
    pub high_precision: bool,
    /// Compression level for this property's records.
    pub compression: Compression,
}

impl PropertyRequest {
    /// Request `name` at default precision and compression.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            high_precision: false,
            compression: Compression::default(),
        }
    }

    /// Set the high-precision flag.
    pub fn with_high_precision(mut self, high_precision: bool) -> Self {
        self.high_precision = high_precision;
        self
    }

    /// Set the compression level.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// A request for `name` that inherits this request's settings.
    pub fn child(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            high_precision: self.high_precision,
            compression: self.compression,
        }
    }
}

impl From<&str> for PropertyRequest {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PropertyRequest {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for PropertyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (high_precision={}, compression={})",
            self.name, self.high_precision, self.compression
        )
    }
}

/// A request resolved against the catalog: the unit of deduplication.
///
/// Only [`PropertyCatalog::resolve`](crate::PropertyCatalog::resolve)
/// constructs these, so every `ResolvedProperty` names a known primitive.
/// Identity is the full `(name, high_precision, compression)` triple: the
/// same primitive at two compression levels is two distinct entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedProperty {
    primitive: PrimitiveProperty,
    high_precision: bool,
    compression: Compression,
}

impl ResolvedProperty {
    pub(crate) fn new(
        primitive: PrimitiveProperty,
        high_precision: bool,
        compression: Compression,
    ) -> Self {
        Self {
            primitive,
            high_precision,
            compression,
        }
    }

    /// Primitive property name.
    pub fn name(&self) -> &'static str {
        self.primitive.name
    }

    /// The catalog entry this property resolved to.
    pub fn primitive(&self) -> &PrimitiveProperty {
        &self.primitive
    }

    /// Writer capability for this property.
    pub fn capability(&self) -> Capability {
        self.primitive.capability
    }

    /// Resolution class for this property.
    pub fn resolution(&self) -> Resolution {
        self.primitive.resolution
    }

    /// Whether dumping this property needs a cross-rank reduction.
    pub fn is_rank_unsafe(&self) -> bool {
        self.primitive.rank_unsafe
    }

    /// High-precision flag.
    pub fn high_precision(&self) -> bool {
        self.high_precision
    }

    /// Compression level.
    pub fn compression(&self) -> Compression {
        self.compression
    }
}

impl fmt::Display for ResolvedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (high_precision={}, compression={})",
            self.name(),
            self.high_precision,
            self.compression
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_match_fast_low_precision() {
        let req = PropertyRequest::from("box");
        assert_eq!(req.name, "box");
        assert!(!req.high_precision);
        assert_eq!(req.compression, Compression::Fast);
    }

    #[test]
    fn child_inherits_settings() {
        let parent = PropertyRequest::new("viz_all")
            .with_high_precision(true)
            .with_compression(Compression::None);
        let child = parent.child("position");
        assert_eq!(child.name, "position");
        assert!(child.high_precision);
        assert_eq!(child.compression, Compression::None);
    }

    #[test]
    fn compression_levels_are_ordered() {
        assert!(Compression::None < Compression::Fast);
        assert!(Compression::Fast < Compression::Medium);
        assert!(Compression::Medium < Compression::Slow);
    }
}
