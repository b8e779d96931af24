//! Property catalog and group expansion for Spool trajectory dumps.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! which quantities a dump archive can carry and how composite group
//! names flatten into them:
//!
//! - [`PropertyCatalog`]: the fixed table of primitive properties, each
//!   with the [`Capability`] the archive writer understands and its
//!   [`Resolution`] class.
//! - [`GroupTable`]: the acyclic table of composite names, and
//!   [`GroupTable::expand`] which flattens requests against it.
//! - [`PropertyRequest`] / [`ResolvedProperty`]: what callers ask for,
//!   and the deduplication key a request resolves to.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod groups;
pub mod property;

pub use catalog::{PrimitiveProperty, PropertyCatalog};
pub use groups::{GroupError, GroupTable};
pub use property::{
    Behavior, Capability, Compression, PropertyRequest, Resolution, ResolvedProperty,
};
