//! [`DeepCopy`] for standard library types.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;

use tracing::trace;

use crate::copier::{Copier, CopyError};
use crate::kind::Kind;
use crate::path::{Path, Step};
use crate::DeepCopy;

// ── Scalars ───────────────────────────────────────────────────────────────

macro_rules! scalar {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl DeepCopy for $ty {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }

                fn deep_copy_with(&self, _: &mut Copier<'_, '_>, _: &Path) -> Result<Self, CopyError> {
                    Ok(self.clone())
                }
            }
        )+
    };
}

scalar!(Bool => bool);
scalar!(Int => i8, i16, i32, i64, i128, isize);
scalar!(Uint => u8, u16, u32, u64, u128, usize);
scalar!(Float => f32, f64);
scalar!(Char => char);
scalar!(String => String);
scalar!(Unit => ());
scalar!(Number => serde_json::Number);

// ── References ────────────────────────────────────────────────────────────

impl<T: DeepCopy> DeepCopy for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Option
    }

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError> {
        match self {
            None => Ok(None),
            Some(value) => copier.copy(value, path).map(Some),
        }
    }
}

/// Owned reference: the target is copied into a new allocation.
impl<T: DeepCopy> DeepCopy for Box<T> {
    fn kind(&self) -> Kind {
        Kind::Ptr
    }

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError> {
        copier.copy(&**self, &path.add(Step::Pointer)).map(Box::new)
    }
}

/// Shared reference: aliasing and cycles are preserved through the
/// [`VisitedPtrMap`](crate::VisitedPtrMap).
///
/// The new allocation holds `T::default()` while its target is copied, so a
/// reference back to it met during the copy resolves to the same handle.
impl<T: DeepCopy + Default> DeepCopy for Rc<RefCell<T>> {
    fn kind(&self) -> Kind {
        Kind::Ptr
    }

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError> {
        if let Some(clone) = copier.visited().get(self) {
            trace!(%path, "reusing clone of visited reference");
            return Ok(clone);
        }
        let clone = Rc::new(RefCell::new(T::default()));
        copier.visited().insert(self, Rc::clone(&clone));
        let target = copier.copy(&*self.borrow(), &path.add(Step::Pointer))?;
        *clone.borrow_mut() = target;
        Ok(clone)
    }
}

// ── Containers ────────────────────────────────────────────────────────────

impl<T: DeepCopy> DeepCopy for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Slice
    }

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError> {
        let mut clone = Vec::with_capacity(self.capacity());
        for (index, item) in self.iter().enumerate() {
            clone.push(copier.copy(item, &path.add(Step::Index(index)))?);
        }
        Ok(clone)
    }
}

impl<K, V, S> DeepCopy for HashMap<K, V, S>
where
    K: DeepCopy + Eq + Hash + Display,
    V: DeepCopy,
    S: BuildHasher + Default + 'static,
{
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError> {
        let mut clone = HashMap::with_capacity_and_hasher(self.len(), S::default());
        for (key, value) in self {
            let (key, value) = copy_entry(copier, path, key, value)?;
            clone.insert(key, value);
        }
        Ok(clone)
    }
}

impl<K, V> DeepCopy for BTreeMap<K, V>
where
    K: DeepCopy + Ord + Display,
    V: DeepCopy,
{
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError> {
        let mut clone = BTreeMap::new();
        for (key, value) in self {
            let (key, value) = copy_entry(copier, path, key, value)?;
            clone.insert(key, value);
        }
        Ok(clone)
    }
}

/// Keys are copied too, they may own nested structures of their own.
fn copy_entry<K, V>(copier: &mut Copier<'_, '_>, path: &Path, key: &K, value: &V) -> Result<(K, V), CopyError>
where
    K: DeepCopy + Display,
    V: DeepCopy,
{
    let label = key.to_string();
    let key_clone = copier.copy(key, &path.add(Step::MapKeyValue(label.clone())))?;
    let value_clone = copier.copy(value, &path.add(Step::MapKey(label)))?;
    Ok((key_clone, value_clone))
}
