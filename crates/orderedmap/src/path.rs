//! Paths to nested values, e.g. `parameters.foo[1][2].bar`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Key of a map.
    Map(String),
    /// Index of an array.
    Index(usize),
}

impl Step {
    pub fn key(&self) -> Option<&str> {
        match self {
            Step::Map(key) => Some(key),
            Step::Index(_) => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Step::Map(_) => None,
            Step::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Map(key) => f.write_str(key),
            Step::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Map(key.to_string())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Step::Map(key)
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path cannot be empty")]
    Empty,

    #[error("path \"{path}\" not found")]
    NotFound { path: String },

    #[error("path \"{path}\": expected object found \"{found}\"")]
    ExpectedObject { path: String, found: String },

    #[error("path \"{path}\": expected array found \"{found}\"")]
    ExpectedArray { path: String, found: String },

    #[error("path \"{path}\": array key can't be negative")]
    NegativeIndex { path: String },

    #[error("path \"{path}\": invalid array index")]
    InvalidIndex { path: String },
}

impl PathError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PathError::NotFound { .. })
    }
}

/// Route to a nested value of an [`OrderedMap`](crate::OrderedMap).
///
/// Parsed from strings like `a.b[1][2].c`: dots separate map keys, a
/// bracketed number is an array index. Displayed in the same form.
///
/// ```
/// use utils_orderedmap::{Path, Step};
///
/// let path: Path = "parameters.foo[1].bar".parse().unwrap();
/// assert_eq!(path.first(), Some(&Step::Map("parameters".into())));
/// assert_eq!(path.last(), Some(&Step::Map("bar".into())));
/// assert_eq!(path.to_string(), "parameters.foo[1].bar");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl Into<Step>) {
        self.steps.push(step.into());
    }

    /// Returns a copy of this path extended with `step`.
    pub fn with(&self, step: impl Into<Step>) -> Path {
        let mut path = self.clone();
        path.push(step);
        path
    }

    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn without_first(&self) -> Path {
        Path {
            steps: self.steps.iter().skip(1).cloned().collect(),
        }
    }

    pub fn without_last(&self) -> Path {
        let len = self.steps.len().saturating_sub(1);
        Path {
            steps: self.steps[..len].to_vec(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromStr for Path {
    type Err = PathError;

    /// Empty segments are skipped, so `a..b` and `a.[1]` parse like `a.b`
    /// and `a[1]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut path = Path::new();
        for part in s.split(['.', '[']).filter(|part| !part.is_empty()) {
            let step = match part.strip_suffix(']') {
                Some(digits) if is_digits(digits) => {
                    let index = digits
                        .parse()
                        .map_err(|_| PathError::InvalidIndex { path: s.to_string() })?;
                    Step::Index(index)
                }
                Some(digits) if digits.strip_prefix('-').is_some_and(is_digits) => {
                    return Err(PathError::NegativeIndex { path: s.to_string() });
                }
                _ => Step::Map(part.to_string()),
            };
            path.push(step);
        }
        Ok(path)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 && matches!(step, Step::Map(_)) {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl From<Vec<Step>> for Path {
    fn from(steps: Vec<Step>) -> Self {
        Path { steps }
    }
}

impl<S: Into<Step>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path {
            steps: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
