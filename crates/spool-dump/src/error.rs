//! Error types for dump resolution, scheduling, and record writing.

use std::error::Error;
use std::fmt;
use std::io;

/// Which half of a dump job a property request came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyRole {
    /// Written once when the job starts.
    Static,
    /// Written periodically.
    Dynamic,
}

impl fmt::Display for PropertyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Errors from building or running a dump job.
///
/// Everything except [`Encoding`](Self::Encoding) is fatal to the job it
/// occurs in. An `Encoding` failure only rejects the one metadata record;
/// the scheduler stays open.
#[derive(Debug)]
pub enum DumpError {
    /// A name is neither a primitive property nor a group that expands
    /// into primitives.
    InvalidProperty {
        /// The unknown name, after group expansion.
        name: String,
        /// Whether it was requested as static or dynamic.
        role: PropertyRole,
    },
    /// A period is zero or negative.
    InvalidPeriod {
        /// The request the period belongs to.
        property: String,
        /// The rejected value.
        period: i64,
    },
    /// A property needing a global reduction was requested while more
    /// than one rank participates.
    RankUnsafeProperty {
        /// The offending primitive property.
        property: String,
        /// Number of participating ranks.
        rank_count: u32,
    },
    /// The mode token is not one of the accepted spellings.
    UnknownMode {
        /// The rejected token.
        token: String,
    },
    /// The archive could not be opened, written, or closed.
    Io(io::Error),
    /// A metadata record payload could not be encoded as text.
    Encoding {
        /// Name of the record being written.
        record: String,
        /// What the encoder rejected.
        reason: String,
    },
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProperty { name, role } => {
                write!(f, "unknown {role} property '{name}'")
            }
            Self::InvalidPeriod { property, period } => {
                write!(
                    f,
                    "period for '{property}' must be a positive step count, got {period}"
                )
            }
            Self::RankUnsafeProperty {
                property,
                rank_count,
            } => {
                write!(
                    f,
                    "property '{property}' cannot be dumped with {rank_count} ranks"
                )
            }
            Self::UnknownMode { token } => {
                write!(
                    f,
                    "unknown dump mode '{token}' (expected \"overwrite\", \"append\", or \"one-shot\")"
                )
            }
            Self::Io(e) => write!(f, "archive I/O error: {e}"),
            Self::Encoding { record, reason } => {
                write!(f, "cannot encode record '{record}': {reason}")
            }
        }
    }
}

impl Error for DumpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DumpError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
