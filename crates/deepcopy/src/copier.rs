//! Traversal context shared by every node of one copy operation.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::kind::type_name;
use crate::path::{Path, Step};
use crate::DeepCopy;

/// Callback invoked for every copied node, after its children were copied.
///
/// Receives the original node, the freshly built clone (which may be
/// modified in place) and the path of the node.
pub type TranslateFn<'f> = dyn FnMut(&dyn Any, &mut dyn Any, &Path) + 'f;

/// Completion closure returned by [`CustomDeepCopy::handle_deep_copy`].
///
/// Receives the clone slot (already holding the placeholder) and the copier
/// to delegate nested values back into the engine.
pub type CloneFn<'a, T> = Box<dyn FnOnce(&mut T, &mut Copier<'_, '_>) -> Result<(), CopyError> + 'a>;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CopyError {
    /// A record field the engine is not allowed to write.
    ///
    /// The whole copy is aborted; no partial clone is returned.
    #[error("deepcopy found unexported field:\n  path: {path}\n  value: {value}")]
    UnexportedField { path: String, value: String },
}

impl CopyError {
    /// `value` is dumped with `Debug`, cut after [`DUMP_LIMIT`] bytes so a
    /// cyclic record still produces a finite message.
    pub fn unexported_field(path: &Path, value: &dyn fmt::Debug) -> Self {
        let path = path.to_string();
        debug!(%path, "deep copy aborted on unexported field");
        CopyError::UnexportedField {
            path,
            value: bounded_dump(value, DUMP_LIMIT),
        }
    }
}

/// Longest `Debug` dump carried by [`CopyError::UnexportedField`].
pub const DUMP_LIMIT: usize = 512;

/// Writer that fails once `limit` bytes were written, which stops the
/// formatter before it can follow a reference cycle forever.
struct Bounded {
    out: String,
    limit: usize,
}

impl fmt::Write for Bounded {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit - self.out.len();
        if s.len() <= room {
            self.out.push_str(s);
            return Ok(());
        }
        let mut end = room;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.out.push_str(&s[..end]);
        Err(fmt::Error)
    }
}

fn bounded_dump(value: &dyn fmt::Debug, limit: usize) -> String {
    let mut writer = Bounded {
        out: String::new(),
        limit,
    };
    if fmt::write(&mut writer, format_args!("{value:?}")).is_err() {
        writer.out.push_str("...");
    }
    writer.out
}

// ── Visited references ────────────────────────────────────────────────────

/// Maps shared references of the original value to their clones.
///
/// If the original holds three references to the same target, the clone
/// holds three references to one cloned target. Entries are registered
/// before the target is copied, so cycles resolve to the in-progress clone.
///
/// Keys are `(type, address)` pairs of the original allocations. A map
/// shared across several copy operations is only meaningful while the
/// originals it was filled from are alive.
#[derive(Default)]
pub struct VisitedPtrMap {
    clones: HashMap<(TypeId, usize), Box<dyn Any>>,
}

impl VisitedPtrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }

    /// Returns the clone registered for `original`, if any.
    pub fn get<T: 'static>(&self, original: &Rc<RefCell<T>>) -> Option<Rc<RefCell<T>>> {
        self.clones
            .get(&identity(original))
            .and_then(|clone| clone.downcast_ref::<Rc<RefCell<T>>>())
            .cloned()
    }

    /// Registers `clone` as the copy of `original`.
    pub fn insert<T: 'static>(&mut self, original: &Rc<RefCell<T>>, clone: Rc<RefCell<T>>) {
        self.clones.insert(identity(original), Box::new(clone));
    }
}

impl fmt::Debug for VisitedPtrMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitedPtrMap").field("len", &self.clones.len()).finish()
    }
}

fn identity<T: 'static>(rc: &Rc<RefCell<T>>) -> (TypeId, usize) {
    (TypeId::of::<T>(), Rc::as_ptr(rc) as *const () as usize)
}

// ── Custom copy hook ──────────────────────────────────────────────────────

/// Override for types the generic traversal cannot rebuild correctly.
///
/// The hook returns an empty instance of the type and an optional completion
/// closure. The engine stores the empty instance as the clone and then runs
/// the closure on it; the closure populates the clone, usually by copying
/// the original's pieces through [`Copier::copy`].
pub trait CustomDeepCopy: Sized + 'static {
    fn handle_deep_copy(&self, steps: &Path) -> (Self, Option<CloneFn<'_, Self>>);
}

// ── Copier ────────────────────────────────────────────────────────────────

/// State of one copy operation: the translate callback and the visited map.
pub struct Copier<'a, 'f> {
    translate: Option<&'a mut TranslateFn<'f>>,
    visited: &'a mut VisitedPtrMap,
}

impl<'a, 'f> Copier<'a, 'f> {
    pub fn new(translate: Option<&'a mut TranslateFn<'f>>, visited: &'a mut VisitedPtrMap) -> Self {
        Self { translate, visited }
    }

    pub fn visited(&mut self) -> &mut VisitedPtrMap {
        self.visited
    }

    /// Copies `original` located at `path` and runs the translate callback
    /// on the result.
    pub fn copy<T: DeepCopy>(&mut self, original: &T, path: &Path) -> Result<T, CopyError> {
        let mut clone = original.deep_copy_with(self, path)?;
        if let Some(translate) = self.translate.as_deref_mut() {
            let path = path.add(Step::Type(original.kind().as_str().into()));
            translate(original, &mut clone, &path);
        }
        Ok(clone)
    }

    /// Rebuilds `original` through its [`CustomDeepCopy`] hook.
    ///
    /// Intended to be called from [`DeepCopy::deep_copy_with`] of types
    /// that provide a hook.
    pub fn copy_custom<T: CustomDeepCopy>(&mut self, original: &T, path: &Path) -> Result<T, CopyError> {
        let steps = path.add(Step::Type(type_name::<T>().into()));
        trace!(path = %steps, "custom deep copy hook");
        let (mut clone, complete) = original.handle_deep_copy(&steps);
        if let Some(complete) = complete {
            complete(&mut clone, self)?;
        }
        Ok(clone)
    }
}

impl fmt::Debug for Copier<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Copier")
            .field("translate", &self.translate.is_some())
            .field("visited", &self.visited)
            .finish()
    }
}
