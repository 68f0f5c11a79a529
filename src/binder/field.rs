//! Explicit per-type schema source.
//!
//! Rust has no runtime reflection, so the schema builder works from a
//! field table that every bindable type exposes through the [`Bindable`]
//! trait. The table is emitted by `#[derive(Bindable)]`
//! (`formbind_macros`): one [`FieldSpec`] per declared field, carrying
//! the raw tag string, a kind tag for coercion dispatch, and accessor
//! function pointers that project a parent struct (as `&dyn Any`) onto
//! the field's storage slot.
//!
//! Field types opt into the table through [`BindField`], which is
//! implemented here for every built-in scalar and `Vec<scalar>`, for
//! `Option<Box<T>>` where `T` is itself bindable (a flattenable
//! "pointer to struct"), by the derive for every derived struct, and by
//! [`bind_opaque!`](crate::bind_opaque) for decoder-only types.

use std::any::{Any, TypeId};

/// Read accessor: parent struct (or field slot) to a contained value.
/// `None` means the input was not the expected type.
pub type AccessFn = fn(&dyn Any) -> Option<&dyn Any>;

/// Write accessor, allocating intermediates where needed.
pub type AccessMutFn = fn(&mut dyn Any) -> Option<&mut dyn Any>;

/// Moves a decoder-produced value into a field slot. Returns `false`
/// when either side is not the expected type.
pub type StoreFn = fn(&mut dyn Any, Box<dyn Any + Send>) -> bool;

/// A type whose values can be bound from and encoded to a [`Values`]
/// map. Implemented by `#[derive(Bindable)]`.
///
/// [`Values`]: crate::values::Values
pub trait Bindable: Default + Sized + 'static {
    /// Type name used in schema diagnostics.
    fn type_name() -> &'static str;

    /// The declared fields, in declaration order.
    fn fields() -> Vec<FieldSpec>;
}

/// A type that can appear as a field of a [`Bindable`] struct.
pub trait BindField: Sized + 'static {
    /// The kind tag driving coercion and encode dispatch.
    fn field_kind() -> FieldKind;
}

/// Semantic kind of a single scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Str,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    /// Generic/dynamic kind: the raw string is stored verbatim in a
    /// `serde_json::Value`.
    Json,
}

impl ScalarKind {
    /// Kind name used in conversion error messages.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Str => "String",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Bool => "bool",
            ScalarKind::Json => "json",
        }
    }
}

/// Projections for a flattenable nested field.
#[derive(Debug, Clone, Copy)]
pub struct NestedSpec {
    /// The child type's own field table.
    pub fields: fn() -> Vec<FieldSpec>,
    /// Field slot to inner struct; `None` prunes the branch (unset
    /// `Option<Box<_>>`) during encode.
    pub enter: AccessFn,
    /// Field slot to inner struct, allocating an unset `Option<Box<_>>`
    /// on the way down during bind.
    pub enter_mut: AccessMutFn,
}

/// Kind tag attached to every field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// One value of the given scalar kind.
    Scalar(ScalarKind),
    /// A `Vec` of the given scalar kind; binds the whole supplied value
    /// list element-wise.
    List(ScalarKind),
    /// A nested struct (or `Option<Box<Struct>>`): flattened into the
    /// parent schema when its tag carries no rename.
    Nested(NestedSpec),
    /// No built-in rule; binds only through a registered decoder.
    Opaque,
}

/// One declared field of one bindable type, as emitted by the derive.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Declared field identifier (the external key when the tag carries
    /// no rename).
    pub ident: &'static str,
    /// Raw tag string, parsed at schema-build time.
    pub tag: &'static str,
    /// Kind tag of the declared field type.
    pub kind: FieldKind,
    /// `TypeId` of the declared field type, for decoder lookup.
    pub type_id: TypeId,
    /// Parent struct to field slot (read).
    pub get: AccessFn,
    /// Parent struct to field slot (write).
    pub get_mut: AccessMutFn,
    /// Stores a decoder-produced boxed value into the field slot.
    pub store: StoreFn,
}

impl FieldSpec {
    /// Build a spec for a field of declared type `F`, with accessors
    /// supplied by the derive.
    pub fn of<F: BindField>(
        ident: &'static str,
        tag: &'static str,
        get: AccessFn,
        get_mut: AccessMutFn,
    ) -> FieldSpec {
        FieldSpec {
            ident,
            tag,
            kind: F::field_kind(),
            type_id: TypeId::of::<F>(),
            get,
            get_mut,
            store: store_as::<F>,
        }
    }
}

fn store_as<F: 'static>(slot: &mut dyn Any, value: Box<dyn Any + Send>) -> bool {
    match (slot.downcast_mut::<F>(), value.downcast::<F>()) {
        (Some(slot), Ok(value)) => {
            *slot = *value;
            true
        }
        _ => false,
    }
}

macro_rules! scalar_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl BindField for $ty {
            fn field_kind() -> FieldKind {
                FieldKind::Scalar(ScalarKind::$kind)
            }
        }

        impl BindField for Vec<$ty> {
            fn field_kind() -> FieldKind {
                FieldKind::List(ScalarKind::$kind)
            }
        }
    )*};
}

scalar_field! {
    String => Str,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    serde_json::Value => Json,
}

/// A boxed optional struct flattens like a plain nested struct; the
/// box is allocated on first bind into one of its fields and left unset
/// by encode when never populated.
impl<T: Bindable> BindField for Option<Box<T>> {
    fn field_kind() -> FieldKind {
        FieldKind::Nested(NestedSpec {
            fields: T::fields,
            enter: |slot| {
                slot.downcast_ref::<Option<Box<T>>>()
                    .and_then(|opt| opt.as_deref())
                    .map(|inner| inner as &dyn Any)
            },
            enter_mut: |slot| {
                slot.downcast_mut::<Option<Box<T>>>().map(|opt| {
                    &mut **opt.get_or_insert_with(|| Box::new(T::default())) as &mut dyn Any
                })
            },
        })
    }
}

/// Declare field types that bind only through a registered decoder.
///
/// ```rust,ignore
/// struct Date { year: i32, month: u32, day: u32 }
/// formbind::bind_opaque!(Date);
/// ```
#[macro_export]
macro_rules! bind_opaque {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::binder::BindField for $ty {
            fn field_kind() -> $crate::binder::FieldKind {
                $crate::binder::FieldKind::Opaque
            }
        }
    )*};
}
