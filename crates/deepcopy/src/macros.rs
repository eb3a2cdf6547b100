/// Implements [`DeepCopy`](crate::DeepCopy) for a record, field by field.
///
/// Every listed field is copied in declaration order with a
/// [`Step::Field`](crate::Step::Field) step. A field marked `#[private]`
/// holds storage the engine must not write; reaching it aborts the whole
/// copy with [`CopyError::UnexportedField`](crate::CopyError::UnexportedField),
/// which carries the path and a `Debug` dump of the record.
///
/// ```
/// use utils_deepcopy::{copy, deep_copy_struct};
///
/// #[derive(Debug, PartialEq)]
/// struct Bar {
///     key1: String,
///     key2: Option<Box<Bar>>,
/// }
///
/// deep_copy_struct!(Bar { key1, key2 });
///
/// let bar = Bar { key1: "abc".into(), key2: None };
/// assert_eq!(copy(&bar).unwrap(), bar);
/// ```
#[macro_export]
macro_rules! deep_copy_struct {
    ($ty:ident { $( $(#[$marker:ident])? $field:ident ),* $(,)? }) => {
        impl $crate::DeepCopy for $ty {
            fn kind(&self) -> $crate::Kind {
                $crate::Kind::Struct
            }

            #[allow(unreachable_code, unused_variables)]
            fn deep_copy_with(
                &self,
                copier: &mut $crate::Copier<'_, '_>,
                path: &$crate::Path,
            ) -> ::core::result::Result<Self, $crate::CopyError> {
                let owner = $crate::type_name::<Self>();
                ::core::result::Result::Ok(Self {
                    $( $field: $crate::deep_copy_struct!(@field self, copier, path, owner, $field $(, $marker)?), )*
                })
            }
        }
    };
    (@field $self:ident, $copier:ident, $path:ident, $owner:ident, $field:ident) => {
        $copier.copy(
            &$self.$field,
            &$path.add($crate::Step::Field {
                owner: $owner.clone().into(),
                field: ::core::stringify!($field),
            }),
        )?
    };
    (@field $self:ident, $copier:ident, $path:ident, $owner:ident, $field:ident, private) => {{
        let path = $path.add($crate::Step::Field {
            owner: $owner.clone().into(),
            field: ::core::stringify!($field),
        });
        return ::core::result::Result::Err($crate::CopyError::unexported_field(&path, $self));
    }};
}
