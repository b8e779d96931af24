//! Archive consistency modes and mode-token parsing.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::DumpError;

/// How a dump job treats the file at its target path.
///
/// # Examples
///
/// ```
/// use spool_dump::DumpMode;
///
/// assert_eq!("append".parse::<DumpMode>().unwrap(), DumpMode::Append);
/// assert_eq!("1".parse::<DumpMode>().unwrap(), DumpMode::OneShot);
/// assert!("x".parse::<DumpMode>().is_err());
/// assert_eq!(DumpMode::OneShot.to_string(), "one-shot");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DumpMode {
    /// Truncate any existing file and write from scratch.
    #[default]
    Overwrite,
    /// Add frames to an existing file.
    Append,
    /// Keep only the most recent fully written frame at the target path.
    ///
    /// The archive writer stages each write cycle separately and then
    /// replaces the published file, so readers never observe a partial
    /// frame.
    OneShot,
}

impl DumpMode {
    /// Canonical token for this mode.
    pub fn token(self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Append => "append",
            Self::OneShot => "one-shot",
        }
    }

    /// The mode actually used for `path`.
    ///
    /// `Append` against a path with no existing file becomes
    /// `Overwrite`; every other combination is unchanged.
    pub fn effective_for(self, path: &Path) -> DumpMode {
        if self == Self::Append && !path.is_file() {
            tracing::debug!(
                path = %path.display(),
                "no existing archive to append to, falling back to overwrite"
            );
            return Self::Overwrite;
        }
        self
    }
}

impl FromStr for DumpMode {
    type Err = DumpError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "overwrite" | "w" => Ok(Self::Overwrite),
            "append" | "a" => Ok(Self::Append),
            "one-shot" | "1" => Ok(Self::OneShot),
            _ => Err(DumpError::UnknownMode {
                token: token.to_string(),
            }),
        }
    }
}

impl fmt::Display for DumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_and_short_tokens() {
        for (token, mode) in [
            ("overwrite", DumpMode::Overwrite),
            ("w", DumpMode::Overwrite),
            ("append", DumpMode::Append),
            ("a", DumpMode::Append),
            ("one-shot", DumpMode::OneShot),
            ("1", DumpMode::OneShot),
        ] {
            assert_eq!(token.parse::<DumpMode>().unwrap(), mode, "{token}");
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        for token in ["x", "", "Overwrite", "oneshot", "rw"] {
            match token.parse::<DumpMode>() {
                Err(DumpError::UnknownMode { token: t }) => assert_eq!(t, token),
                other => panic!("expected UnknownMode for {token:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn token_round_trips() {
        for mode in [DumpMode::Overwrite, DumpMode::Append, DumpMode::OneShot] {
            assert_eq!(mode.token().parse::<DumpMode>().unwrap(), mode);
        }
    }

    #[test]
    fn append_without_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("traj.tar");
        assert_eq!(DumpMode::Append.effective_for(&missing), DumpMode::Overwrite);
        // A directory is not an archive file either.
        assert_eq!(DumpMode::Append.effective_for(dir.path()), DumpMode::Overwrite);
    }

    #[test]
    fn append_with_file_is_kept() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(DumpMode::Append.effective_for(file.path()), DumpMode::Append);
    }

    #[test]
    fn other_modes_ignore_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("traj.zip");
        assert_eq!(DumpMode::OneShot.effective_for(&missing), DumpMode::OneShot);
        assert_eq!(DumpMode::Overwrite.effective_for(&missing), DumpMode::Overwrite);
    }
}
