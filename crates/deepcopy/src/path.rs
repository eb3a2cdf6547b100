//! Traversal paths reported by the copy engine.
//!
//! A [`Path`] describes the route from the copy root to the node currently
//! being visited. It is used in error messages and handed to translate
//! callbacks, which may branch on its shape (for example, skip every node
//! below a `.<key>` step).

use std::borrow::Cow;
use std::fmt;

/// A single step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Type information, e.g. the kind of a node passed to a translate callback.
    Type(Cow<'static, str>),
    /// Dereference of an owned or shared reference.
    Pointer,
    /// Unwrap of a dynamically typed container, carrying the concrete type.
    Interface(Cow<'static, str>),
    /// Named field of a record.
    Field {
        owner: Cow<'static, str>,
        field: &'static str,
    },
    /// Position in a sequence.
    Index(usize),
    /// Value stored under a key of an unordered map.
    MapKey(String),
    /// The key itself of an unordered map entry.
    MapKeyValue(String),
    /// Value stored under a key of an ordered container.
    Entry(String),
    /// The key itself of an ordered container entry.
    EntryKey(String),
}

impl Step {
    /// Whether the step addresses a key rather than a value.
    pub fn is_key(&self) -> bool {
        matches!(self, Step::MapKeyValue(_) | Step::EntryKey(_))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Type(name) => f.write_str(name),
            Step::Pointer => f.write_str("*"),
            Step::Interface(target) => write!(f, "interface[{target}]"),
            Step::Field { owner, field } => write!(f, "{owner}[{field}]"),
            Step::Index(index) => write!(f, "slice[{index}]"),
            Step::MapKey(key) => write!(f, "map[{key}]"),
            Step::MapKeyValue(key) => write!(f, "map[{key}].<key>"),
            Step::Entry(key) => write!(f, "[{key}]"),
            Step::EntryKey(key) => write!(f, "[{key}].<key>"),
        }
    }
}

/// Route from the copy root to a nested value.
///
/// Paths are never mutated in place: [`Path::add`] returns a new path, so
/// sibling branches of a traversal cannot observe each other's steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this path extended with `step`.
    pub fn add(&self, step: Step) -> Path {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        Path { steps }
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

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Whether any step of the path addresses a map key.
    pub fn contains_key_step(&self) -> bool {
        self.steps.iter().any(Step::is_key)
    }
}

impl From<Vec<Step>> for Path {
    fn from(steps: Vec<Step>) -> Self {
        Path { steps }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prev: Option<&Step> = None;
        for step in &self.steps {
            let rendered = step.to_string();
            // No separator after a dereference or before a bracketed step.
            let joined = matches!(prev, None | Some(Step::Pointer)) || rendered.starts_with('[');
            if !joined {
                f.write_str(".")?;
            }
            f.write_str(&rendered)?;
            prev = Some(step);
        }
        Ok(())
    }
}
