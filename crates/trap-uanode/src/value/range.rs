// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Index ranges requested alongside read and write events.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConversionError, ConversionResult};
use crate::value::{Variant, VariantArray};

/// A single dimension of a [`NumericRange`]: one index or `low:high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexRange {
    /// First index.
    pub low: u32,
    /// Last index (inclusive), `None` for a single index.
    pub high: Option<u32>,
}

impl IndexRange {
    /// Returns the last index covered.
    #[inline]
    pub fn last(&self) -> u32 {
        self.high.unwrap_or(self.low)
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.high {
            Some(high) => write!(f, "{}:{}", self.low, high),
            None => write!(f, "{}", self.low),
        }
    }
}

/// Parsed index range, e.g. `"2"`, `"1:4"` or `"0:1,2:3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumericRange {
    dimensions: Vec<IndexRange>,
}

impl NumericRange {
    /// Returns the per-dimension ranges.
    #[inline]
    pub fn dimensions(&self) -> &[IndexRange] {
        &self.dimensions
    }

    /// Selects the covered elements of a one-dimensional array variant.
    ///
    /// # Errors
    ///
    /// Fails for non-array variants, multi-dimensional ranges or arrays,
    /// and when any covered index lies beyond the array.
    pub fn apply(&self, variant: &Variant) -> ConversionResult<Variant> {
        let array = variant
            .as_array()
            .ok_or_else(|| ConversionError::invalid_range(self.to_string(), "value is not an array"))?;

        if self.dimensions.len() != 1 || array.dimension_count() != 1 {
            return Err(ConversionError::invalid_range(
                self.to_string(),
                "only one-dimensional ranges are supported",
            ));
        }

        let range = self.dimensions[0];
        let (low, high) = (range.low as usize, range.last() as usize);
        if high >= array.len() {
            return Err(ConversionError::invalid_range(
                self.to_string(),
                format!("index {} beyond array length {}", high, array.len()),
            ));
        }

        let selected = array.elements()[low..=high].to_vec();
        Ok(Variant::Array(VariantArray::new(array.element_type(), selected)?))
    }
}

impl FromStr for NumericRange {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConversionError::invalid_range(s, "empty range"));
        }

        let parse_index = |text: &str| {
            text.trim()
                .parse::<u32>()
                .map_err(|_| ConversionError::invalid_range(s, format!("invalid index '{}'", text)))
        };

        let dimensions = s
            .split(',')
            .map(|part| match part.split_once(':') {
                Some((low, high)) => {
                    let low = parse_index(low)?;
                    let high = parse_index(high)?;
                    if high <= low {
                        return Err(ConversionError::invalid_range(
                            s,
                            "upper bound must exceed lower bound",
                        ));
                    }
                    Ok(IndexRange {
                        low,
                        high: Some(high),
                    })
                }
                None => Ok(IndexRange {
                    low: parse_index(part)?,
                    high: None,
                }),
            })
            .collect::<ConversionResult<Vec<_>>>()?;

        Ok(Self { dimensions })
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dim) in self.dimensions.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", dim)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{vec_from_variant, vec_to_variant};

    #[test]
    fn test_parse_forms() {
        let range: NumericRange = "3".parse().unwrap();
        assert_eq!(range.dimensions(), &[IndexRange { low: 3, high: None }]);

        let range: NumericRange = "1:4".parse().unwrap();
        assert_eq!(range.dimensions()[0].last(), 4);

        let range: NumericRange = "0:1,2:3".parse().unwrap();
        assert_eq!(range.dimensions().len(), 2);
        assert_eq!(range.to_string(), "0:1,2:3");
    }

    #[test]
    fn test_parse_rejects_bad_bounds() {
        assert!("4:4".parse::<NumericRange>().is_err());
        assert!("5:2".parse::<NumericRange>().is_err());
        assert!("a".parse::<NumericRange>().is_err());
        assert!("".parse::<NumericRange>().is_err());
    }

    #[test]
    fn test_apply_selects_subarray() {
        let variant = vec_to_variant(&[10i32, 11, 12, 13, 14]);
        let range: NumericRange = "1:3".parse().unwrap();
        let selected = range.apply(&variant).unwrap();
        assert_eq!(vec_from_variant::<i32>(&selected).unwrap(), vec![11, 12, 13]);

        let range: NumericRange = "3:4".parse().unwrap();
        let selected = range.apply(&variant).unwrap();
        assert_eq!(vec_from_variant::<i32>(&selected).unwrap(), vec![13, 14]);

        let range: NumericRange = "7".parse().unwrap();
        assert!(range.apply(&variant).is_err());
    }

    #[test]
    fn test_apply_rejects_upper_bound_past_end() {
        let variant = vec_to_variant(&[1i32, 2, 3]);

        let range: NumericRange = "1:10".parse().unwrap();
        let err = range.apply(&variant).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidRange { .. }));

        let range: NumericRange = "1:3".parse().unwrap();
        assert!(range.apply(&variant).is_err());

        let range: NumericRange = "1:2".parse().unwrap();
        let selected = range.apply(&variant).unwrap();
        assert_eq!(vec_from_variant::<i32>(&selected).unwrap(), vec![2, 3]);
    }
}
