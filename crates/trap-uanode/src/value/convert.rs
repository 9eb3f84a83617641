// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Conversion between native values and [`Variant`].
//!
//! Type tags are resolved at compile time through [`UaType`]: only the
//! closed set of supported native kinds implements it, so an unknown kind
//! is rejected by the compiler instead of at runtime.
//!
//! # Examples
//!
//! ```
//! use trap_uanode::value::{from_variant, to_variant, vec_from_variant, vec_to_variant};
//!
//! let v = to_variant(42i32);
//! assert_eq!(from_variant::<i32>(&v).unwrap(), 42);
//!
//! let v = vec_to_variant(&[1.5f64, 2.5]);
//! assert_eq!(vec_from_variant::<f64>(&v).unwrap(), vec![1.5, 2.5]);
//!
//! // Empty sequences produce no variant content.
//! assert!(vec_to_variant::<u8>(&[]).is_empty());
//! ```

use crate::error::{ConversionError, ConversionResult};
use crate::value::{DataTypeTag, Scalar, Variant, VariantArray};

/// A native type with a fixed variant representation.
pub trait UaType: Sized + Clone {
    /// The tag this type maps to.
    const DATA_TYPE: DataTypeTag;

    /// Wraps the value into a tagged scalar.
    fn into_scalar(self) -> Scalar;

    /// Extracts the value if the scalar carries this type.
    fn from_scalar(scalar: &Scalar) -> Option<Self>;
}

macro_rules! impl_ua_type {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl UaType for $ty {
                const DATA_TYPE: DataTypeTag = DataTypeTag::$tag;

                #[inline]
                fn into_scalar(self) -> Scalar {
                    Scalar::$tag(self)
                }

                #[inline]
                fn from_scalar(scalar: &Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::$tag(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_ua_type! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
}

/// Returns the tag of a value's native kind.
#[inline]
pub fn type_tag<T: UaType>(_value: &T) -> DataTypeTag {
    T::DATA_TYPE
}

/// Returns the tag of a native kind.
#[inline]
pub const fn type_tag_of<T: UaType>() -> DataTypeTag {
    T::DATA_TYPE
}

/// Converts a scalar into a variant.
#[inline]
pub fn to_variant<T: UaType>(value: T) -> Variant {
    Variant::Scalar(value.into_scalar())
}

/// Converts a homogeneous sequence into an array variant.
///
/// An empty sequence yields [`Variant::Empty`].
pub fn vec_to_variant<T: UaType>(values: &[T]) -> Variant {
    if values.is_empty() {
        return Variant::Empty;
    }

    let elements = values.iter().cloned().map(T::into_scalar).collect();
    // every element comes from T, so the homogeneity check cannot fail
    match VariantArray::new(T::DATA_TYPE, elements) {
        Ok(array) => Variant::Array(array),
        Err(_) => Variant::Empty,
    }
}

/// Reads a scalar out of a variant.
///
/// The variant must hold a scalar of exactly `T`'s kind; no numeric
/// widening or string parsing is performed.
///
/// # Errors
///
/// Returns [`ConversionError::EmptyVariant`] for an empty variant and
/// [`ConversionError::TypeMismatch`] for any other kind or for arrays.
pub fn from_variant<T: UaType>(variant: &Variant) -> ConversionResult<T> {
    match variant {
        Variant::Empty => Err(ConversionError::EmptyVariant),
        Variant::Scalar(scalar) => T::from_scalar(scalar).ok_or_else(|| {
            ConversionError::type_mismatch(T::DATA_TYPE.name(), scalar.data_type().name())
        }),
        Variant::Array(_) => Err(ConversionError::type_mismatch(
            T::DATA_TYPE.name(),
            variant.kind_name(),
        )),
    }
}

/// Reads a sequence out of an array variant.
///
/// # Errors
///
/// Fails unless the variant holds a non-empty, one-dimensional array of
/// `T`'s kind.
pub fn vec_from_variant<T: UaType>(variant: &Variant) -> ConversionResult<Vec<T>> {
    let array = match variant {
        Variant::Array(array) => array,
        Variant::Empty => return Err(ConversionError::EmptyVariant),
        Variant::Scalar(_) => {
            return Err(ConversionError::type_mismatch(
                format!("{}[]", T::DATA_TYPE.name()),
                variant.kind_name(),
            ))
        }
    };

    if array.dimension_count() != 1 {
        return Err(ConversionError::NotVectorizable {
            dimensions: array.dimension_count(),
        });
    }
    if array.is_empty() {
        return Err(ConversionError::EmptyArray);
    }
    if array.element_type() != T::DATA_TYPE {
        return Err(ConversionError::type_mismatch(
            T::DATA_TYPE.name(),
            array.element_type().name(),
        ));
    }

    array
        .elements()
        .iter()
        .map(|e| {
            T::from_scalar(e).ok_or_else(|| {
                ConversionError::type_mismatch(T::DATA_TYPE.name(), e.data_type().name())
            })
        })
        .collect()
}

/// Reads a sequence into `target`, leaving it untouched on failure.
///
/// Existing content is replaced on success.
pub fn fill_from_variant<T: UaType>(target: &mut Vec<T>, variant: &Variant) -> ConversionResult<()> {
    *target = vec_from_variant(variant)?;
    Ok(())
}
