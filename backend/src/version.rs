//! Tool release versions embedded in cache directory names.

use crate::types::VersionError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Shape a directory name segment must have before it is parsed at all.
static VERSION_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+(\.\d+)?(-[A-Za-z0-9_]+)*(-\d{14}[+-]\d{4})?$").unwrap()
});

static VERSION_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+(?:\.\d+)+)(?:-([A-Za-z]+)-(\d+)([a-z]?))?(?:-(SNAPSHOT|\d{14}(?:[-+]\d{4})?))?$",
    )
    .unwrap()
});

/// True when `text` has the shape of a tool version, e.g. `7.4`, `7.4.2`,
/// `8.0-rc-1` or `8.0-milestone-1-20210101120000+0000`.
pub fn matches_version_grammar(text: &str) -> bool {
    VERSION_GRAMMAR.is_match(text)
}

/// Pre-release stage such as `milestone-2` or `rc-1b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub name: String,
    pub number: u32,
    pub patch: Option<char>,
}

impl Stage {
    fn rank(&self) -> u8 {
        match self.name.to_ascii_lowercase().as_str() {
            "milestone" => 1,
            "preview" => 2,
            "rc" => 3,
            _ => 0,
        }
    }
}

impl Ord for Stage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.number.cmp(&other.number))
            .then_with(|| self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for Stage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A parsed tool release version.
///
/// Ordering: numeric base first (missing components count as zero), then a
/// final release above any of its stages, then a non-snapshot above its
/// snapshots. Snapshot timestamps compare as text.
#[derive(Debug, Clone)]
pub struct ToolVersion {
    text: String,
    base: Vec<u64>,
    stage: Option<Stage>,
    snapshot: Option<String>,
}

impl ToolVersion {
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let caps = VERSION_PARTS
            .captures(text)
            .ok_or_else(|| VersionError::Malformed(text.to_string()))?;

        let base = caps[1]
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| VersionError::Overflow(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let stage = match (caps.get(2), caps.get(3)) {
            (Some(name), Some(number)) => Some(Stage {
                name: name.as_str().to_string(),
                number: number
                    .as_str()
                    .parse()
                    .map_err(|_| VersionError::Overflow(number.as_str().to_string()))?,
                patch: caps.get(4).and_then(|p| p.as_str().chars().next()),
            }),
            _ => None,
        };

        Ok(Self {
            text: text.to_string(),
            base,
            stage,
            snapshot: caps.get(5).map(|s| s.as_str().to_string()),
        })
    }

    pub fn major(&self) -> u64 {
        self.base[0]
    }

    pub fn minor(&self) -> u64 {
        self.base.get(1).copied().unwrap_or(0)
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    pub fn is_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn cmp_base(&self, other: &Self) -> Ordering {
        let len = self.base.len().max(other.base.len());
        (0..len)
            .map(|i| {
                let a = self.base.get(i).copied().unwrap_or(0);
                let b = other.base.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// `None` sorts above `Some`: the unqualified release wins.
fn cmp_qualifier<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

impl Ord for ToolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_base(other)
            .then_with(|| cmp_qualifier(&self.stage, &other.stage))
            .then_with(|| cmp_qualifier(&self.snapshot, &other.snapshot))
    }
}

impl PartialOrd for ToolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ToolVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ToolVersion {}

impl FromStr for ToolVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
