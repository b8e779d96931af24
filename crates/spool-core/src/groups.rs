//! Composite property groups and their expansion.
//!
//! A [`GroupTable`] maps composite names (`"all"`, `"viz_static"`, ...) to
//! ordered child names, each either a primitive property or another
//! group. The table is checked once at construction to be a DAG, so
//! [`GroupTable::expand`] can recurse without a depth guard.

use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::catalog::PropertyCatalog;
use crate::property::PropertyRequest;

const STANDARD_GROUPS: &[(&str, &[&str])] = &[
    (
        "all",
        &[
            "particle_all",
            "angle_all",
            "bond_all",
            "dihedral_all",
            "improper_all",
            "global_all",
        ],
    ),
    (
        "particle_all",
        &[
            "angular_momentum",
            "body",
            "charge",
            "diameter",
            "image",
            "mass",
            "moment_inertia",
            "orientation",
            "position",
            "type",
            "type_names",
            "velocity",
        ],
    ),
    ("angle_all", &["angle_type_names", "angle_tag", "angle_type"]),
    ("bond_all", &["bond_type_names", "bond_tag", "bond_type"]),
    (
        "dihedral_all",
        &["dihedral_type_names", "dihedral_tag", "dihedral_type"],
    ),
    (
        "improper_all",
        &["improper_type_names", "improper_tag", "improper_type"],
    ),
    ("global_all", &["box", "dimensions"]),
    ("viz_dynamic", &["position", "box"]),
    ("viz_static", &["type", "type_names", "dimensions"]),
    ("viz_all", &["viz_static", "viz_dynamic"]),
    ("viz_aniso_dynamic", &["viz_dynamic", "orientation"]),
    ("viz_aniso_all", &["viz_static", "viz_aniso_dynamic"]),
];

/// Errors detected while building a [`GroupTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupError {
    /// Following child links from a group leads back to it.
    Cycle {
        /// The cycle, starting and ending at the same group.
        path: Vec<String>,
    },
    /// A group was declared with no children.
    EmptyGroup {
        /// The offending group.
        group: String,
    },
    /// A group uses the name of a primitive property.
    ShadowsPrimitive {
        /// The offending group.
        group: String,
    },
    /// The same group name was declared twice.
    DuplicateGroup {
        /// The repeated name.
        group: String,
    },
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle { path } => write!(f, "group cycle: {}", path.join(" -> ")),
            Self::EmptyGroup { group } => write!(f, "group '{group}' has no children"),
            Self::ShadowsPrimitive { group } => {
                write!(f, "group '{group}' shadows a primitive property")
            }
            Self::DuplicateGroup { group } => write!(f, "group '{group}' declared twice"),
        }
    }
}

impl Error for GroupError {}

/// Acyclic table of composite property names.
///
/// # Examples
///
/// ```
/// use spool_core::{GroupTable, PropertyRequest};
///
/// let groups = GroupTable::standard();
/// let expanded = groups.expand(&[PropertyRequest::from("viz_all")]);
/// let names: Vec<_> = expanded.iter().map(|r| r.name.as_str()).collect();
/// assert_eq!(names, ["type", "type_names", "dimensions", "position", "box"]);
/// ```
#[derive(Clone, Debug)]
pub struct GroupTable {
    groups: IndexMap<String, Vec<String>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl GroupTable {
    /// Build a table from `(group, children)` pairs.
    ///
    /// Fails if any group is empty, repeats, shadows a primitive property
    /// in the standard catalog, or participates in a cycle. Child names
    /// that are neither groups nor primitives are allowed; they pass
    /// through expansion and fail later validation.
    pub fn new<I, G, C, S>(entries: I) -> Result<Self, GroupError>
    where
        I: IntoIterator<Item = (G, C)>,
        G: Into<String>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let catalog = PropertyCatalog::standard();
        let mut groups = IndexMap::new();
        for (group, children) in entries {
            let group = group.into();
            let children: Vec<String> = children.into_iter().map(Into::into).collect();
            if children.is_empty() {
                return Err(GroupError::EmptyGroup { group });
            }
            if catalog.contains(&group) {
                return Err(GroupError::ShadowsPrimitive { group });
            }
            if groups.contains_key(&group) {
                return Err(GroupError::DuplicateGroup { group });
            }
            groups.insert(group, children);
        }
        let table = Self { groups };
        table.check_acyclic()?;
        Ok(table)
    }

    /// The standard composite table.
    ///
    /// # Panics
    ///
    /// Panics on first use if the built-in table fails validation.
    pub fn standard() -> &'static GroupTable {
        static STANDARD: OnceLock<GroupTable> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let entries = STANDARD_GROUPS
                .iter()
                .map(|&(group, children)| (group, children.iter().copied()));
            match GroupTable::new(entries) {
                Ok(table) => table,
                Err(e) => panic!("standard group table is invalid: {e}"),
            }
        })
    }

    fn check_acyclic(&self) -> Result<(), GroupError> {
        let mut marks = vec![Mark::Unvisited; self.groups.len()];
        let mut stack = Vec::new();
        for index in 0..self.groups.len() {
            self.visit(index, &mut marks, &mut stack)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        index: usize,
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
    ) -> Result<(), GroupError> {
        match marks[index] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                let start = stack.iter().position(|&i| i == index).unwrap_or(0);
                let mut path: Vec<String> = stack[start..]
                    .iter()
                    .map(|&i| self.group_name(i).to_string())
                    .collect();
                path.push(self.group_name(index).to_string());
                return Err(GroupError::Cycle { path });
            }
            Mark::Unvisited => {}
        }
        marks[index] = Mark::InProgress;
        stack.push(index);
        if let Some((_, children)) = self.groups.get_index(index) {
            for child in children {
                if let Some(child_index) = self.groups.get_index_of(child.as_str()) {
                    self.visit(child_index, marks, stack)?;
                }
            }
        }
        stack.pop();
        marks[index] = Mark::Done;
        Ok(())
    }

    fn group_name(&self, index: usize) -> &str {
        self.groups
            .get_index(index)
            .map(|(name, _)| name.as_str())
            .unwrap_or_default()
    }

    /// Whether `name` is a composite group.
    pub fn is_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Direct children of a group, in declaration order.
    pub fn children(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// All group names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Flatten requests into non-group requests.
    ///
    /// Each group request is replaced by its children, in order, each
    /// inheriting the group's precision and compression, recursively.
    /// Everything else passes through untouched, including unknown
    /// names. The output is the pre-order traversal of the expansion
    /// and may contain duplicates; callers deduplicate by value.
    pub fn expand(&self, requests: &[PropertyRequest]) -> Vec<PropertyRequest> {
        let mut out = Vec::with_capacity(requests.len());
        for request in requests {
            self.expand_into(request, &mut out);
        }
        out
    }

    fn expand_into(&self, request: &PropertyRequest, out: &mut Vec<PropertyRequest>) {
        match self.groups.get(request.name.as_str()) {
            Some(children) => {
                for child in children {
                    self.expand_into(&request.child(child), out);
                }
            }
            None => out.push(request.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Compression;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn names(requests: &[PropertyRequest]) -> Vec<&str> {
        requests.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn primitive_passes_through() {
        let out = GroupTable::standard().expand(&[PropertyRequest::from("position")]);
        assert_eq!(names(&out), ["position"]);
    }

    #[test]
    fn unknown_name_passes_through() {
        let out = GroupTable::standard().expand(&[PropertyRequest::from("no_such_thing")]);
        assert_eq!(names(&out), ["no_such_thing"]);
    }

    #[test]
    fn nested_groups_expand_in_preorder() {
        let out = GroupTable::standard().expand(&[PropertyRequest::from("viz_aniso_all")]);
        assert_eq!(
            names(&out),
            ["type", "type_names", "dimensions", "position", "box", "orientation"]
        );
    }

    #[test]
    fn children_inherit_settings() {
        let req = PropertyRequest::new("global_all")
            .with_high_precision(true)
            .with_compression(Compression::Slow);
        let out = GroupTable::standard().expand(&[req]);
        assert_eq!(out.len(), 2);
        for child in &out {
            assert!(child.high_precision);
            assert_eq!(child.compression, Compression::Slow);
        }
    }

    #[test]
    fn every_standard_leaf_is_a_primitive() {
        let groups = GroupTable::standard();
        let catalog = PropertyCatalog::standard();
        for group in groups.names() {
            for leaf in groups.expand(&[PropertyRequest::from(group)]) {
                assert!(catalog.contains(&leaf.name), "{group} -> {}", leaf.name);
            }
        }
    }

    #[test]
    fn all_is_union_of_component_groups() {
        let groups = GroupTable::standard();
        let leaves = |name: &str| -> BTreeSet<String> {
            groups
                .expand(&[PropertyRequest::from(name)])
                .into_iter()
                .map(|r| r.name)
                .collect()
        };
        let mut union = BTreeSet::new();
        for part in [
            "particle_all",
            "angle_all",
            "bond_all",
            "dihedral_all",
            "improper_all",
            "global_all",
        ] {
            union.extend(leaves(part));
        }
        let all = groups.expand(&[PropertyRequest::from("all")]);
        assert_eq!(leaves("all"), union);
        // No primitive appears twice in the expansion of "all".
        assert_eq!(all.len(), union.len());
        // Every catalog entry except the reductions is reachable from "all".
        assert_eq!(union.len(), PropertyCatalog::standard().len() - 2);
    }

    #[test]
    fn cycle_is_rejected_with_path() {
        let err = GroupTable::new([
            ("a", vec!["b"]),
            ("b", vec!["c", "position"]),
            ("c", vec!["a"]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            GroupError::Cycle {
                path: vec!["a".into(), "b".into(), "c".into(), "a".into()],
            }
        );
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let err = GroupTable::new([("loop", vec!["loop"])]).unwrap_err();
        assert!(matches!(err, GroupError::Cycle { .. }));
    }

    #[test]
    fn empty_group_is_rejected() {
        let err = GroupTable::new([("nothing", Vec::<&str>::new())]).unwrap_err();
        assert_eq!(err, GroupError::EmptyGroup { group: "nothing".into() });
    }

    #[test]
    fn shadowing_primitive_is_rejected() {
        let err = GroupTable::new([("position", vec!["velocity"])]).unwrap_err();
        assert_eq!(err, GroupError::ShadowsPrimitive { group: "position".into() });
    }

    #[test]
    fn duplicate_group_is_rejected() {
        let err = GroupTable::new([("g", vec!["box"]), ("g", vec!["mass"])]).unwrap_err();
        assert_eq!(err, GroupError::DuplicateGroup { group: "g".into() });
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let table = GroupTable::new([
            ("top", vec!["left", "right"]),
            ("left", vec!["base"]),
            ("right", vec!["base"]),
            ("base", vec!["mass"]),
        ])
        .unwrap();
        let out = table.expand(&[PropertyRequest::from("top")]);
        assert_eq!(names(&out), ["mass", "mass"]);
    }

    // ── Proptest strategies ─────────────────────────────────────

    fn arb_name() -> impl Strategy<Value = String> {
        let groups: Vec<String> = GroupTable::standard().names().map(str::to_string).collect();
        let primitives: Vec<String> = PropertyCatalog::standard()
            .iter()
            .map(|p| p.name.to_string())
            .collect();
        prop_oneof![
            prop::sample::select(groups),
            prop::sample::select(primitives),
            "[a-z_]{1,12}",
        ]
    }

    fn arb_compression() -> impl Strategy<Value = Compression> {
        prop_oneof![
            Just(Compression::None),
            Just(Compression::Fast),
            Just(Compression::Medium),
            Just(Compression::Slow),
        ]
    }

    fn arb_request() -> impl Strategy<Value = PropertyRequest> {
        (arb_name(), any::<bool>(), arb_compression()).prop_map(|(name, hp, c)| {
            PropertyRequest::new(name)
                .with_high_precision(hp)
                .with_compression(c)
        })
    }

    proptest! {
        #[test]
        fn expansion_is_idempotent(requests in prop::collection::vec(arb_request(), 0..8)) {
            let groups = GroupTable::standard();
            let once = groups.expand(&requests);
            let twice = groups.expand(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn expansion_leaves_no_groups(requests in prop::collection::vec(arb_request(), 0..8)) {
            let groups = GroupTable::standard();
            for out in groups.expand(&requests) {
                prop_assert!(!groups.is_group(&out.name));
            }
        }

        #[test]
        fn expansion_is_deterministic(requests in prop::collection::vec(arb_request(), 0..8)) {
            let groups = GroupTable::standard();
            prop_assert_eq!(groups.expand(&requests), groups.expand(&requests));
        }
    }
}
