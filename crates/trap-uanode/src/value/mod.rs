// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Value conversion between native types and the tagged variant form.
//!
//! This module is the only place values cross into the variant
//! representation used by attributes, data sources and method arguments.
//!
//! - [`DataTypeTag`]: closed set of supported built-in types
//! - [`Variant`]: empty, scalar, or homogeneous array
//! - [`UaType`]: compile-time mapping of native kinds to tags
//! - [`DataValue`]: value plus status and timestamps
//! - [`NumericRange`]: index range of read/write requests

mod convert;
mod data_value;
mod range;
mod tag;
mod variant;

pub use convert::{
    fill_from_variant, from_variant, to_variant, type_tag, type_tag_of, vec_from_variant,
    vec_to_variant, UaType,
};
pub use data_value::DataValue;
pub use range::{IndexRange, NumericRange};
pub use tag::DataTypeTag;
pub use variant::{Scalar, Variant, VariantArray};
