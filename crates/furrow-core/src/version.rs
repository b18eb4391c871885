use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,
    #[error("invalid version segment {segment:?} in {input:?}")]
    InvalidSegment { segment: String, input: String },
}

/// A dotted release version, for example `6.4.2` or `6.4.2-beta`.
///
/// Segments are compared numerically, left to right; a missing trailing
/// segment counts as zero, so `1.2` and `1.2.0` are equal. The pre-release
/// tag (everything after the first `-`) is carried through formatting but is
/// informational only: it does not participate in the ordering. Release
/// servers distinguish equal-version beta builds by commit hash instead.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
    pre_release: Option<String>,
}

impl Version {
    #[must_use]
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    #[must_use]
    pub fn pre_release(&self) -> Option<&str> {
        self.pre_release.as_deref()
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let (core, pre_release) = match s.split_once('-') {
            Some((core, tag)) if !tag.is_empty() => (core, Some(tag.to_string())),
            Some((core, _)) => (core, None),
            None => (s, None),
        };
        if core.is_empty() {
            return Err(VersionError::Empty);
        }

        let segments = core
            .split('.')
            .map(|segment| {
                segment
                    .parse::<u64>()
                    .map_err(|_| VersionError::InvalidSegment {
                        segment: segment.to_string(),
                        input: s.to_string(),
                    })
            })
            .collect::<Result<Vec<u64>, VersionError>>()?;

        Ok(Version {
            segments,
            pre_release,
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let left = self.segments.get(i).copied().unwrap_or(0);
            let right = other.segments.get(i).copied().unwrap_or(0);
            match left.cmp(&right) {
                Ordering::Equal => {}
                decided => return decided,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        if let Some(tag) = &self.pre_release {
            write!(f, "-{tag}")?;
        }
        Ok(())
    }
}

/// Compare two dotted version strings.
///
/// `Ordering::Greater` means `left` is the newer release.
///
/// # Errors
/// Returns [`VersionError`] when either input is empty or contains a
/// non-numeric segment outside the pre-release tag.
pub fn compare_versions(left: &str, right: &str) -> Result<Ordering, VersionError> {
    let left: Version = left.parse()?;
    let right: Version = right.parse()?;
    Ok(left.cmp(&right))
}
