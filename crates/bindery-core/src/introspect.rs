//! Static type introspection: the fallback type source consulted when a
//! field declaration carries no explicit tag.

use crate::value::Value;
use bindery_schema::{
    decl::FieldDecl,
    types::{ScalarType, TypeInfo, TypeTag},
};
use time::PrimitiveDateTime;

///
/// StaticType
///
/// Maps a Rust field type to its inferred canonical tag, nullability, and
/// collection-ness. `Option` contributes nullability, `Vec` collection-ness
/// with the element's tag.
///

pub trait StaticType {
    fn type_info() -> TypeInfo;
}

macro_rules! scalar_static_type {
    ( $( $ty:ty => $tag:ident ),* $(,)? ) => {
        $(
            impl StaticType for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::new(TypeTag::Scalar(ScalarType::$tag), false, false)
                }
            }
        )*
    };
}

scalar_static_type! {
    String => String,
    i8 => Integer,
    i16 => Integer,
    i32 => Integer,
    i64 => Integer,
    u8 => Integer,
    u16 => Integer,
    u32 => Integer,
    f32 => Float,
    f64 => Float,
    bool => Boolean,
    PrimitiveDateTime => Date,
}

impl StaticType for Value {
    fn type_info() -> TypeInfo {
        TypeInfo::new(TypeTag::Scalar(ScalarType::Raw), false, false)
    }
}

impl<T: StaticType> StaticType for Option<T> {
    fn type_info() -> TypeInfo {
        let inner = T::type_info();
        TypeInfo::new(inner.tag, true, inner.is_collection)
    }
}

impl<T: StaticType> StaticType for Vec<T> {
    fn type_info() -> TypeInfo {
        let inner = T::type_info();
        TypeInfo::new(inner.tag, false, true)
    }
}

/// Declare a field whose type is inferred from the Rust field type.
#[must_use]
pub fn field<F: StaticType>(name: &str) -> FieldDecl {
    FieldDecl::new(name).inferred(F::type_info())
}
