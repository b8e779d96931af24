//! Resolved dump jobs.
//!
//! [`DumpSpec::build`] expands composite groups, validates every
//! resulting name against the catalog, and deduplicates:
//!
//! - static requests collapse on the full `(name, high_precision,
//!   compression)` triple;
//! - dynamic requests merge their periods into one set per resolved
//!   property, so a repeated period registers once.

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use spool_core::{GroupTable, PropertyCatalog, PropertyRequest, ResolvedProperty};

use crate::error::{DumpError, PropertyRole};

/// One or more step periods for a dynamic request.
///
/// Values are signed so that zero and negative input can be reported as
/// [`DumpError::InvalidPeriod`] rather than silently wrapping.
///
/// # Examples
///
/// ```
/// use spool_dump::Periods;
///
/// let single = Periods::from(100);
/// assert_eq!(single.as_slice(), &[100]);
///
/// let several = Periods::from([10, 10, 20]);
/// assert_eq!(several.as_slice(), &[10, 10, 20]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Periods(SmallVec<[i64; 2]>);

impl Periods {
    /// The periods as given, including repeats.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    fn validated(&self, property: &str) -> Result<BTreeSet<u64>, DumpError> {
        self.0
            .iter()
            .map(|&period| match u64::try_from(period) {
                Ok(steps) if steps > 0 => Ok(steps),
                _ => Err(DumpError::InvalidPeriod {
                    property: property.to_string(),
                    period,
                }),
            })
            .collect()
    }
}

impl From<i64> for Periods {
    fn from(period: i64) -> Self {
        Self(SmallVec::from_elem(period, 1))
    }
}

impl From<i32> for Periods {
    fn from(period: i32) -> Self {
        Self::from(i64::from(period))
    }
}

impl<const N: usize> From<[i32; N]> for Periods {
    fn from(periods: [i32; N]) -> Self {
        periods.into_iter().map(i64::from).collect()
    }
}

impl From<Vec<i64>> for Periods {
    fn from(periods: Vec<i64>) -> Self {
        Self(SmallVec::from_vec(periods))
    }
}

impl From<&[i64]> for Periods {
    fn from(periods: &[i64]) -> Self {
        Self(SmallVec::from_slice(periods))
    }
}

impl<const N: usize> From<[i64; N]> for Periods {
    fn from(periods: [i64; N]) -> Self {
        Self(periods.into_iter().collect())
    }
}

impl FromIterator<i64> for Periods {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A fully resolved dump job.
///
/// Immutable once built. Iteration order follows first appearance in
/// the expanded requests, so registration order and diagnostics are
/// reproducible.
///
/// # Examples
///
/// ```
/// use spool_core::PropertyRequest;
/// use spool_dump::{DumpSpec, Periods};
///
/// let spec = DumpSpec::build(
///     &[PropertyRequest::from("viz_static")],
///     &[(PropertyRequest::from("position"), Periods::from(100))],
/// )
/// .unwrap();
///
/// let statics: Vec<_> = spec.static_properties().map(|p| p.name()).collect();
/// assert_eq!(statics, ["type", "type_names", "dimensions"]);
/// assert_eq!(spec.registration_count(), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpSpec {
    static_properties: IndexSet<ResolvedProperty>,
    dynamic_properties: IndexMap<ResolvedProperty, BTreeSet<u64>>,
}

impl DumpSpec {
    /// Build a spec against the standard group table and catalog.
    pub fn build(
        static_requests: &[PropertyRequest],
        dynamic_requests: &[(PropertyRequest, Periods)],
    ) -> Result<Self, DumpError> {
        Self::build_with(
            GroupTable::standard(),
            PropertyCatalog::standard(),
            static_requests,
            dynamic_requests,
        )
    }

    /// Build a spec against a specific group table and catalog.
    pub fn build_with(
        groups: &GroupTable,
        catalog: &PropertyCatalog,
        static_requests: &[PropertyRequest],
        dynamic_requests: &[(PropertyRequest, Periods)],
    ) -> Result<Self, DumpError> {
        let mut static_properties = IndexSet::new();
        for request in groups.expand(static_requests) {
            static_properties.insert(resolve(catalog, &request, PropertyRole::Static)?);
        }

        let mut dynamic_properties: IndexMap<ResolvedProperty, BTreeSet<u64>> = IndexMap::new();
        for (request, periods) in dynamic_requests {
            let periods = periods.validated(&request.name)?;
            for child in groups.expand(std::slice::from_ref(request)) {
                let resolved = resolve(catalog, &child, PropertyRole::Dynamic)?;
                if periods.is_empty() {
                    continue;
                }
                dynamic_properties
                    .entry(resolved)
                    .or_default()
                    .extend(periods.iter().copied());
            }
        }

        Ok(Self {
            static_properties,
            dynamic_properties,
        })
    }

    /// Properties written once at job start.
    pub fn static_properties(&self) -> impl Iterator<Item = &ResolvedProperty> {
        self.static_properties.iter()
    }

    /// Properties written periodically, each with its ascending period set.
    pub fn dynamic_properties(&self) -> impl Iterator<Item = (&ResolvedProperty, &BTreeSet<u64>)> {
        self.dynamic_properties.iter()
    }

    /// Periods registered for a dynamic property, if any.
    pub fn periods_of(&self, property: &ResolvedProperty) -> Option<&BTreeSet<u64>> {
        self.dynamic_properties.get(property)
    }

    /// Number of distinct static properties.
    pub fn static_len(&self) -> usize {
        self.static_properties.len()
    }

    /// Number of distinct dynamic properties.
    pub fn dynamic_len(&self) -> usize {
        self.dynamic_properties.len()
    }

    /// Total writer registrations this spec produces: one per static
    /// property plus one per `(dynamic property, period)` pair.
    pub fn registration_count(&self) -> usize {
        self.static_properties.len()
            + self
                .dynamic_properties
                .values()
                .map(BTreeSet::len)
                .sum::<usize>()
    }

    /// Whether the job registers nothing.
    pub fn is_empty(&self) -> bool {
        self.static_properties.is_empty() && self.dynamic_properties.is_empty()
    }

    /// Every resolved property, static first, that is unsafe to dump
    /// across more than one rank.
    pub fn rank_unsafe_properties(&self) -> impl Iterator<Item = &ResolvedProperty> {
        self.static_properties
            .iter()
            .chain(self.dynamic_properties.keys())
            .filter(|p| p.is_rank_unsafe())
    }
}

fn resolve(
    catalog: &PropertyCatalog,
    request: &PropertyRequest,
    role: PropertyRole,
) -> Result<ResolvedProperty, DumpError> {
    catalog
        .resolve(request)
        .ok_or_else(|| DumpError::InvalidProperty {
            name: request.name.clone(),
            role,
        })
}
