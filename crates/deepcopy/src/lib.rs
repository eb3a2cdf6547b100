//! Deep copy and deep translate of structured values.
//!
//! The engine walks a value through its [`DeepCopy`] implementation and
//! builds a clone that is equal to the original but shares no mutable
//! storage with it. Shared references (`Rc<RefCell<T>>`) keep their
//! topology: two references to one target in the original become two
//! references to one new target in the clone, and cycles are closed on the
//! in-progress clone instead of looping.
//!
//! A translate callback can modify each cloned node once its children are
//! done, and types that keep internal state the generic traversal cannot
//! rebuild provide a [`CustomDeepCopy`] hook.
//!
//! # Example
//!
//! ```
//! use std::any::Any;
//! use utils_deepcopy::{copy, copy_translate, deep_copy_struct, Path};
//!
//! #[derive(Debug, PartialEq)]
//! struct Bar {
//!     key1: String,
//!     key2: String,
//! }
//!
//! deep_copy_struct!(Bar { key1, key2 });
//!
//! let original = Box::new(Bar { key1: "abc".into(), key2: "def".into() });
//! let clone = copy(&original).unwrap();
//! assert_eq!(original, clone);
//! assert!(!std::ptr::eq(&*original, &*clone));
//!
//! let upper = copy_translate(&original, |_: &dyn Any, clone: &mut dyn Any, _: &Path| {
//!     if let Some(s) = clone.downcast_mut::<String>() {
//!         *s = s.to_uppercase();
//!     }
//! })
//! .unwrap();
//! assert_eq!(upper.key1, "ABC");
//! ```

use std::any::Any;

mod copier;
mod dynamic;
mod impls;
mod kind;
mod macros;
pub mod path;

pub use copier::{CloneFn, Copier, CopyError, CustomDeepCopy, TranslateFn, VisitedPtrMap, DUMP_LIMIT};
pub use dynamic::DynCopy;
pub use kind::{type_name, Kind};
pub use path::{Path, Step};

/// A value the engine can copy.
///
/// Implementations copy their children through [`Copier::copy`], extending
/// `path` with one [`Step`] per child. The translate callback for the node
/// itself is run by the copier, not by the implementation.
pub trait DeepCopy: Any + Sized {
    fn kind(&self) -> Kind;

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError>;
}

/// Makes a deep copy of `value`.
pub fn copy<T: DeepCopy>(value: &T) -> Result<T, CopyError> {
    copy_translate_steps(value, None, &Path::new(), &mut VisitedPtrMap::new())
}

/// Makes a deep copy of `value`, passing every cloned node to `translate`.
///
/// The callback runs bottom-up: children before their parent.
pub fn copy_translate<T, F>(value: &T, mut translate: F) -> Result<T, CopyError>
where
    T: DeepCopy,
    F: FnMut(&dyn Any, &mut dyn Any, &Path),
{
    copy_translate_steps(value, Some(&mut translate), &Path::new(), &mut VisitedPtrMap::new())
}

/// Makes a deep copy of `value` starting at `path`.
///
/// Passing the same `visited` map to several calls puts their results in
/// one aliasing domain: a shared reference copied by an earlier call is
/// reused by the later ones.
pub fn copy_translate_steps<T: DeepCopy>(
    value: &T,
    translate: Option<&mut TranslateFn<'_>>,
    path: &Path,
    visited: &mut VisitedPtrMap,
) -> Result<T, CopyError> {
    Copier::new(translate, visited).copy(value, path)
}
