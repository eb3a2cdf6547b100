//! Deep copy support.
//!
//! A map's order lives beside its entries, so the generic traversal would
//! rebuild the entries but not the order. [`OrderedMap`] therefore copies
//! through its custom hook: each key is copied at an `[k].<key>` step, each
//! value at a `[k]` step, and the pairs are re-inserted in the original
//! order.

use utils_deepcopy::{type_name, CloneFn, Copier, CopyError, CustomDeepCopy, DeepCopy, Kind, Path, Step};

use crate::{OrderedMap, Value};

impl CustomDeepCopy for OrderedMap {
    fn handle_deep_copy(&self, steps: &Path) -> (Self, Option<CloneFn<'_, Self>>) {
        let steps = steps.clone();
        let complete = clone_fn(move |clone, copier| {
            for (key, value) in self.iter() {
                let key_clone = copier.copy(&key.to_string(), &steps.add(Step::EntryKey(key.to_string())))?;
                let value_clone = copier.copy(value, &steps.add(Step::Entry(key.to_string())))?;
                clone.set(key_clone, value_clone);
            }
            Ok(())
        });
        (OrderedMap::with_capacity(self.len()), Some(complete))
    }
}

fn clone_fn<'a, F>(complete: F) -> CloneFn<'a, OrderedMap>
where
    F: FnOnce(&mut OrderedMap, &mut Copier<'_, '_>) -> Result<(), CopyError> + 'a,
{
    Box::new(complete)
}

impl DeepCopy for OrderedMap {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError> {
        copier.copy_custom(self, path)
    }
}

impl DeepCopy for Value {
    fn kind(&self) -> Kind {
        Kind::Interface
    }

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError> {
        Ok(match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(copy_variant(copier, path, b)?),
            Value::Number(n) => Value::Number(copy_variant(copier, path, n)?),
            Value::String(s) => Value::String(copy_variant(copier, path, s)?),
            Value::Array(items) => Value::Array(copy_variant(copier, path, items)?),
            Value::Map(map) => Value::Map(copy_variant(copier, path, map)?),
            Value::Any(payload) => {
                let payload = &**payload;
                let path = path.add(Step::Interface(payload.type_name().into()));
                Value::Any(payload.copy_dyn(copier, &path)?)
            }
        })
    }
}

fn copy_variant<T: DeepCopy>(copier: &mut Copier<'_, '_>, path: &Path, inner: &T) -> Result<T, CopyError> {
    copier.copy(inner, &path.add(Step::Interface(type_name::<T>().into())))
}
