//! Compares a run against a reference answer file.
//!
//! The reference holds one `key=min/avg/max` line per key. Differences are
//! collected as [`Mismatch`] values for the caller to print; they never fail
//! the run. Only an unreadable or malformed reference is an error.

use std::fmt;
use std::fs;
use std::path::Path;

use ahash::AHashMap;
use thiserror::Error;

use crate::merge::FinalResult;
use crate::report::tenths;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("reference line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Expected min/avg/max for one key, in tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expected {
    pub min: i64,
    pub mean: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    KeyCount { expected: usize, actual: usize },
    TotalCount { expected: u64, actual: u64 },
    Missing(String),
    Extra(String),
    Values {
        key: String,
        expected: Expected,
        actual: Expected,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::KeyCount { expected, actual } => {
                write!(f, "! station count should be {expected} but is {actual}")
            }
            Mismatch::TotalCount { expected, actual } => {
                write!(f, "! measurement count should be {expected} but is {actual}")
            }
            Mismatch::Missing(key) => {
                write!(f, "! missing station ({}) \"{key}\"", key.len())
            }
            Mismatch::Extra(key) => write!(f, "! extra station \"{key}\""),
            Mismatch::Values {
                key,
                expected,
                actual,
            } => write!(
                f,
                "! \"{key}\" should be {}/{}/{} but is {}/{}/{}",
                tenths(expected.min),
                tenths(expected.mean),
                tenths(expected.max),
                tenths(actual.min),
                tenths(actual.mean),
                tenths(actual.max),
            ),
        }
    }
}

fn display_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

/// Parsed reference answers, keyed by raw bytes.
#[derive(Debug, Clone, Default)]
pub struct Reference {
    entries: AHashMap<Box<[u8]>, Expected>,
}

impl Reference {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(text: &str) -> Result<Self, VerifyError> {
        let mut entries: AHashMap<Box<[u8]>, Expected> = AHashMap::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let malformed = |reason: &str| VerifyError::Malformed {
                line: i + 1,
                reason: reason.to_string(),
            };

            let (key, values) = line.rsplit_once('=').ok_or_else(|| malformed("missing '='"))?;
            let mut parts = values.splitn(3, '/');
            let mut next = || -> Result<i64, VerifyError> {
                let field = parts.next().ok_or_else(|| malformed("expected min/avg/max"))?;
                let v = lexical_core::parse::<f64>(field.trim().as_bytes())
                    .map_err(|e| malformed(&format!("bad number {field:?}: {e}")))?;
                Ok((v * 10.0).round() as i64)
            };
            let expected = Expected {
                min: next()?,
                mean: next()?,
                max: next()?,
            };
            entries.insert(key.as_bytes().into(), expected);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lists every difference between `result` and this reference.
    ///
    /// The total observation count is only checked when `expected_total` is
    /// given.
    pub fn compare(&self, result: &FinalResult, expected_total: Option<u64>) -> Vec<Mismatch> {
        let mut out = Vec::new();

        if self.entries.len() != result.len() {
            out.push(Mismatch::KeyCount {
                expected: self.entries.len(),
                actual: result.len(),
            });
        }

        if let Some(expected) = expected_total {
            let actual = result.total_count();
            if actual != expected {
                out.push(Mismatch::TotalCount { expected, actual });
            }
        }

        let actual: AHashMap<&[u8], Expected> = result
            .iter()
            .filter_map(|(key, stats)| {
                let e = Expected {
                    min: stats.min,
                    mean: stats.mean_tenths()?,
                    max: stats.max,
                };
                Some((key, e))
            })
            .collect();

        let mut missing: Vec<&[u8]> = self
            .entries
            .keys()
            .map(|k| &k[..])
            .filter(|k| !actual.contains_key(k))
            .collect();
        missing.sort_unstable();
        out.extend(missing.into_iter().map(|k| Mismatch::Missing(display_key(k))));

        let mut extra: Vec<&[u8]> = actual
            .keys()
            .copied()
            .filter(|k| !self.entries.contains_key(*k))
            .collect();
        extra.sort_unstable();
        out.extend(extra.into_iter().map(|k| Mismatch::Extra(display_key(k))));

        let mut shared: Vec<(&[u8], &Expected)> = self
            .entries
            .iter()
            .map(|(k, e)| (&k[..], e))
            .filter(|(k, _)| actual.contains_key(k))
            .collect();
        shared.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (key, expected) in shared {
            let got = actual[key];
            if got != *expected {
                out.push(Mismatch::Values {
                    key: display_key(key),
                    expected: *expected,
                    actual: got,
                });
            }
        }

        out
    }
}
