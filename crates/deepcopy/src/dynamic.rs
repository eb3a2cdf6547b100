//! Dynamically typed values.
//!
//! `Box<dyn DynCopy>` is the tagged-union container of the engine: copying
//! it unwraps the concrete payload, records an
//! [`Step::Interface`](crate::Step::Interface) step carrying the payload's
//! type and copies the payload with its own [`DeepCopy`] implementation.

use std::any::Any;
use std::fmt;

use crate::copier::{Copier, CopyError};
use crate::kind::{type_name, Kind};
use crate::path::{Path, Step};
use crate::DeepCopy;

/// Object-safe view of a copyable value.
///
/// Implemented for every `DeepCopy + Debug + PartialEq` type.
pub trait DynCopy: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Short name of the concrete type.
    fn type_name(&self) -> String;

    /// Copies the concrete value through `copier`.
    fn copy_dyn(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Box<dyn DynCopy>, CopyError>;

    fn eq_dyn(&self, other: &dyn DynCopy) -> bool;
}

impl<T: DeepCopy + fmt::Debug + PartialEq> DynCopy for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> String {
        type_name::<T>()
    }

    fn copy_dyn(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Box<dyn DynCopy>, CopyError> {
        Ok(Box::new(copier.copy(self, path)?))
    }

    fn eq_dyn(&self, other: &dyn DynCopy) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

impl dyn DynCopy {
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl PartialEq for dyn DynCopy {
    fn eq(&self, other: &Self) -> bool {
        self.eq_dyn(other)
    }
}

impl DeepCopy for Box<dyn DynCopy> {
    fn kind(&self) -> Kind {
        Kind::Interface
    }

    fn deep_copy_with(&self, copier: &mut Copier<'_, '_>, path: &Path) -> Result<Self, CopyError> {
        // Dispatch on the payload, not on the box itself.
        let payload: &dyn DynCopy = &**self;
        let path = path.add(Step::Interface(payload.type_name().into()));
        payload.copy_dyn(copier, &path)
    }
}
