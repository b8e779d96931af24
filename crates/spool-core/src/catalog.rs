//! The fixed table of dumpable primitive properties.

use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::property::{Capability, PropertyRequest, Resolution, ResolvedProperty};

/// One catalog entry: an atomic quantity the archive writer can encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveProperty {
    /// Property name as callers spell it.
    pub name: &'static str,
    /// Writer capability used when registering the property.
    pub capability: Capability,
    /// How values map onto entities.
    pub resolution: Resolution,
    /// Needs a global reduction; disallowed with more than one rank.
    pub rank_unsafe: bool,
}

const fn entry(
    name: &'static str,
    capability: Capability,
    resolution: Resolution,
) -> PrimitiveProperty {
    PrimitiveProperty {
        name,
        capability,
        resolution,
        rank_unsafe: false,
    }
}

const fn reduced(
    name: &'static str,
    capability: Capability,
    resolution: Resolution,
) -> PrimitiveProperty {
    PrimitiveProperty {
        name,
        capability,
        resolution,
        rank_unsafe: true,
    }
}

// Sorted by name.
const STANDARD_PROPERTIES: &[PrimitiveProperty] = &[
    entry("angle_tag", Capability::AngleTags, Resolution::Individual),
    entry("angle_type", Capability::AngleTypes, Resolution::Individual),
    entry("angle_type_names", Capability::AngleNames, Resolution::Text),
    entry("angular_momentum", Capability::AngularMomentum, Resolution::Individual),
    entry("body", Capability::Body, Resolution::Individual),
    entry("bond_tag", Capability::BondTags, Resolution::Individual),
    entry("bond_type", Capability::BondTypes, Resolution::Individual),
    entry("bond_type_names", Capability::BondNames, Resolution::Text),
    entry("box", Capability::SimulationBox, Resolution::Uniform),
    entry("charge", Capability::Charge, Resolution::Individual),
    entry("diameter", Capability::Diameter, Resolution::Individual),
    entry("dihedral_tag", Capability::DihedralTags, Resolution::Individual),
    entry("dihedral_type", Capability::DihedralTypes, Resolution::Individual),
    entry("dihedral_type_names", Capability::DihedralNames, Resolution::Text),
    entry("dimensions", Capability::Dimensions, Resolution::Uniform),
    entry("image", Capability::Image, Resolution::Individual),
    entry("improper_tag", Capability::ImproperTags, Resolution::Individual),
    entry("improper_type", Capability::ImproperTypes, Resolution::Individual),
    entry("improper_type_names", Capability::ImproperNames, Resolution::Text),
    entry("mass", Capability::Mass, Resolution::Individual),
    entry("moment_inertia", Capability::MomentInertia, Resolution::Individual),
    entry("orientation", Capability::Orientation, Resolution::Individual),
    entry("position", Capability::Position, Resolution::Individual),
    reduced("potential_energy", Capability::PotentialEnergy, Resolution::Individual),
    entry("type", Capability::Type, Resolution::Individual),
    entry("type_names", Capability::TypeNames, Resolution::Text),
    entry("velocity", Capability::Velocity, Resolution::Individual),
    reduced("virial", Capability::Virial, Resolution::Individual),
];

/// Immutable lookup table from primitive property names to their
/// writer capability and resolution class.
///
/// Built once per process by [`standard`](Self::standard) and never
/// mutated afterwards.
///
/// # Examples
///
/// ```
/// use spool_core::{Capability, PropertyCatalog, Resolution};
///
/// let catalog = PropertyCatalog::standard();
/// let (capability, resolution) = catalog.lookup("box").unwrap();
/// assert_eq!(capability, Capability::SimulationBox);
/// assert_eq!(resolution, Resolution::Uniform);
///
/// assert!(catalog.lookup("viz_static").is_none());
/// assert!(catalog.is_rank_unsafe("virial"));
/// assert!(!catalog.is_rank_unsafe("position"));
/// ```
#[derive(Debug)]
pub struct PropertyCatalog {
    entries: IndexMap<&'static str, PrimitiveProperty>,
}

impl PropertyCatalog {
    /// The process-wide standard catalog.
    pub fn standard() -> &'static PropertyCatalog {
        static STANDARD: OnceLock<PropertyCatalog> = OnceLock::new();
        STANDARD.get_or_init(|| PropertyCatalog {
            entries: STANDARD_PROPERTIES
                .iter()
                .map(|prop| (prop.name, *prop))
                .collect(),
        })
    }

    /// Capability and resolution class for `name`, or `None` if the
    /// name is not a primitive property.
    pub fn lookup(&self, name: &str) -> Option<(Capability, Resolution)> {
        self.entries
            .get(name)
            .map(|prop| (prop.capability, prop.resolution))
    }

    /// The full catalog entry for `name`.
    pub fn get(&self, name: &str) -> Option<&PrimitiveProperty> {
        self.entries.get(name)
    }

    /// Whether `name` is a primitive property.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether dumping `name` requires a cross-rank reduction.
    ///
    /// Unknown names are not rank-unsafe; they fail validation instead.
    pub fn is_rank_unsafe(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|prop| prop.rank_unsafe)
    }

    /// Resolve a request against the catalog.
    ///
    /// Returns `None` if the request names a composite group or an
    /// unknown property; expand groups first.
    pub fn resolve(&self, request: &PropertyRequest) -> Option<ResolvedProperty> {
        self.entries.get(request.name.as_str()).map(|prop| {
            ResolvedProperty::new(*prop, request.high_precision, request.compression)
        })
    }

    /// All entries, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &PrimitiveProperty> {
        self.entries.values()
    }

    /// Number of primitive properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Compression;

    #[test]
    fn standard_catalog_has_every_primitive() {
        let catalog = PropertyCatalog::standard();
        assert_eq!(catalog.len(), 28);
        for name in [
            "position",
            "velocity",
            "orientation",
            "angular_momentum",
            "image",
            "body",
            "mass",
            "moment_inertia",
            "charge",
            "diameter",
            "type",
            "type_names",
            "bond_type_names",
            "angle_type_names",
            "dihedral_type_names",
            "improper_type_names",
            "bond_tag",
            "bond_type",
            "angle_tag",
            "angle_type",
            "dihedral_tag",
            "dihedral_type",
            "improper_tag",
            "improper_type",
            "box",
            "dimensions",
            "potential_energy",
            "virial",
        ] {
            assert!(catalog.contains(name), "missing {name}");
        }
    }

    #[test]
    fn table_is_sorted_and_unique() {
        let names: Vec<_> = STANDARD_PROPERTIES.iter().map(|p| p.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn capabilities_are_unique() {
        let catalog = PropertyCatalog::standard();
        let mut caps: Vec<_> = catalog.iter().map(|p| p.capability).collect();
        caps.sort_unstable();
        caps.dedup();
        assert_eq!(caps.len(), catalog.len());
    }

    #[test]
    fn only_reductions_are_rank_unsafe() {
        let catalog = PropertyCatalog::standard();
        let unsafe_names: Vec<_> = catalog
            .iter()
            .filter(|p| p.rank_unsafe)
            .map(|p| p.name)
            .collect();
        assert_eq!(unsafe_names, vec!["potential_energy", "virial"]);
        assert!(!catalog.is_rank_unsafe("no_such_property"));
    }

    #[test]
    fn resolution_classes() {
        let catalog = PropertyCatalog::standard();
        assert_eq!(catalog.lookup("type_names").unwrap().1, Resolution::Text);
        assert_eq!(catalog.lookup("bond_type_names").unwrap().1, Resolution::Text);
        assert_eq!(catalog.lookup("dimensions").unwrap().1, Resolution::Uniform);
        assert_eq!(catalog.lookup("bond_tag").unwrap().1, Resolution::Individual);
        assert_eq!(catalog.lookup("virial").unwrap().1, Resolution::Individual);
    }

    #[test]
    fn resolve_keeps_request_settings() {
        let catalog = PropertyCatalog::standard();
        let req = PropertyRequest::new("velocity")
            .with_high_precision(true)
            .with_compression(Compression::Medium);
        let resolved = catalog.resolve(&req).unwrap();
        assert_eq!(resolved.name(), "velocity");
        assert_eq!(resolved.capability(), Capability::Velocity);
        assert!(resolved.high_precision());
        assert_eq!(resolved.compression(), Compression::Medium);
        assert!(catalog.resolve(&PropertyRequest::from("all")).is_none());
    }
}
