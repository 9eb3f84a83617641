// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Tagged variant container.

use std::fmt;

use crate::error::{ConversionError, ConversionResult};
use crate::value::DataTypeTag;

// =============================================================================
// Scalar
// =============================================================================

/// A single built-in value with its type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean value.
    Boolean(bool),
    /// Signed 8-bit integer.
    SByte(i8),
    /// Unsigned 8-bit integer.
    Byte(u8),
    /// Signed 16-bit integer.
    Int16(i16),
    /// Unsigned 16-bit integer.
    UInt16(u16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    String(String),
}

impl Scalar {
    /// Returns the type tag of this value.
    pub const fn data_type(&self) -> DataTypeTag {
        match self {
            Self::Boolean(_) => DataTypeTag::Boolean,
            Self::SByte(_) => DataTypeTag::SByte,
            Self::Byte(_) => DataTypeTag::Byte,
            Self::Int16(_) => DataTypeTag::Int16,
            Self::UInt16(_) => DataTypeTag::UInt16,
            Self::Int32(_) => DataTypeTag::Int32,
            Self::UInt32(_) => DataTypeTag::UInt32,
            Self::Int64(_) => DataTypeTag::Int64,
            Self::UInt64(_) => DataTypeTag::UInt64,
            Self::Float(_) => DataTypeTag::Float,
            Self::Double(_) => DataTypeTag::Double,
            Self::String(_) => DataTypeTag::String,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::SByte(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::UInt16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "\"{}\"", v),
        }
    }
}

// =============================================================================
// VariantArray
// =============================================================================

/// Homogeneous array payload of a variant.
///
/// `dimensions` is empty for the implicit one-dimensional case. When set,
/// the product of all dimensions equals the element count.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantArray {
    element_type: DataTypeTag,
    elements: Vec<Scalar>,
    dimensions: Vec<u32>,
}

impl VariantArray {
    /// Creates a one-dimensional array.
    ///
    /// # Errors
    ///
    /// Returns an error if any element does not match `element_type`.
    pub fn new(element_type: DataTypeTag, elements: Vec<Scalar>) -> ConversionResult<Self> {
        if let Some((position, bad)) = elements
            .iter()
            .enumerate()
            .find(|(_, e)| e.data_type() != element_type)
        {
            return Err(ConversionError::heterogeneous(
                position,
                element_type.name(),
                bad.data_type().name(),
            ));
        }

        Ok(Self {
            element_type,
            elements,
            dimensions: Vec::new(),
        })
    }

    /// Declares explicit array dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions do not cover the element count.
    pub fn with_dimensions(mut self, dimensions: Vec<u32>) -> ConversionResult<Self> {
        let covered = dimensions
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d as usize));
        if covered != Some(self.elements.len()) {
            return Err(ConversionError::DimensionMismatch {
                dimensions,
                length: self.elements.len(),
            });
        }
        self.dimensions = dimensions;
        Ok(self)
    }

    /// Returns the element type.
    #[inline]
    pub fn element_type(&self) -> DataTypeTag {
        self.element_type
    }

    /// Returns the elements in storage order.
    #[inline]
    pub fn elements(&self) -> &[Scalar] {
        &self.elements
    }

    /// Consumes the array and returns its elements.
    #[inline]
    pub fn into_elements(self) -> Vec<Scalar> {
        self.elements
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the declared dimensions (empty for implicit 1-D).
    #[inline]
    pub fn dimensions(&self) -> &[u32] {
        &self.dimensions
    }

    /// Returns the number of dimensions.
    pub fn dimension_count(&self) -> usize {
        self.dimensions.len().max(1)
    }
}

// =============================================================================
// Variant
// =============================================================================

/// Universal value-exchange container: empty, one scalar, or one array.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// No value.
    #[default]
    Empty,
    /// A single value.
    Scalar(Scalar),
    /// An array of values of one kind.
    Array(VariantArray),
}

impl Variant {
    /// Returns `true` if the variant holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` for scalar content.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns `true` for array content.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns `true` for a non-empty one-dimensional array.
    pub fn is_vectorizable(&self) -> bool {
        match self {
            Self::Array(a) => a.dimension_count() == 1 && !a.is_empty(),
            _ => false,
        }
    }

    /// Returns the type tag of the content, `None` when empty.
    pub fn data_type(&self) -> Option<DataTypeTag> {
        match self {
            Self::Empty => None,
            Self::Scalar(s) => Some(s.data_type()),
            Self::Array(a) => Some(a.element_type()),
        }
    }

    /// Returns the scalar content.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array content.
    pub fn as_array(&self) -> Option<&VariantArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a short description of the content kind.
    pub(crate) fn kind_name(&self) -> String {
        match self {
            Self::Empty => "Empty".to_string(),
            Self::Scalar(s) => s.data_type().name().to_string(),
            Self::Array(a) => format!("{}[]", a.element_type().name()),
        }
    }
}

impl From<Scalar> for Variant {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<VariantArray> for Variant {
    fn from(array: VariantArray) -> Self {
        Self::Array(array)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_string()))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("<empty>"),
            Self::Scalar(s) => write!(f, "{}", s),
            Self::Array(a) => {
                f.write_str("[")?;
                for (i, e) in a.elements().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_rejects_mixed_elements() {
        let result = VariantArray::new(
            DataTypeTag::Int32,
            vec![Scalar::Int32(1), Scalar::Double(2.0)],
        );
        assert!(matches!(
            result,
            Err(ConversionError::HeterogeneousArray { position: 1, .. })
        ));
    }

    #[test]
    fn test_array_dimensions() {
        let array = VariantArray::new(
            DataTypeTag::Byte,
            (0..6).map(Scalar::Byte).collect(),
        )
        .unwrap();
        assert_eq!(array.dimension_count(), 1);

        let matrix = array.clone().with_dimensions(vec![2, 3]).unwrap();
        assert_eq!(matrix.dimension_count(), 2);
        assert!(!Variant::from(matrix).is_vectorizable());

        assert!(array.with_dimensions(vec![4, 2]).is_err());
    }

    #[test]
    fn test_variant_kind() {
        assert!(Variant::default().is_empty());
        assert_eq!(Variant::default().data_type(), None);

        let v = Variant::from("abc");
        assert!(v.is_scalar());
        assert_eq!(v.data_type(), Some(DataTypeTag::String));
        assert_eq!(v.to_string(), "\"abc\"");
    }
}
