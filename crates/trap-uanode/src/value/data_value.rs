// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Value with status and timestamps, as exchanged by read/write events.

use chrono::{DateTime, Utc};

use crate::types::StatusCode;
use crate::value::Variant;

/// A variant together with its status and timestamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValue {
    /// The value.
    pub value: Variant,

    /// Status of the value.
    pub status: StatusCode,

    /// When the source produced the value.
    pub source_timestamp: Option<DateTime<Utc>>,

    /// When the server received the value.
    pub server_timestamp: Option<DateTime<Utc>>,
}

impl DataValue {
    /// Creates a good data value without timestamps.
    pub fn new(value: impl Into<Variant>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Returns `true` if a non-empty value is present.
    #[inline]
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// Returns `true` if a source timestamp is present.
    #[inline]
    pub fn has_source_timestamp(&self) -> bool {
        self.source_timestamp.is_some()
    }

    /// Replaces the value.
    pub fn set_value(&mut self, value: impl Into<Variant>) {
        self.value = value.into();
    }

    /// Sets the status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Stamps the current time as source timestamp.
    pub fn stamp_source_now(&mut self) {
        self.source_timestamp = Some(Utc::now());
    }

    /// Stamps the current time as server timestamp.
    pub fn stamp_server_now(&mut self) {
        self.server_timestamp = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::to_variant;

    #[test]
    fn test_stamp_source_now() {
        let mut value = DataValue::new(to_variant(1.5f64));
        assert!(value.has_value());
        assert!(!value.has_source_timestamp());

        let before = Utc::now();
        value.stamp_source_now();
        let stamped = value.source_timestamp.unwrap();
        assert!(stamped >= before);
        assert!(value.server_timestamp.is_none());
    }

    #[test]
    fn test_default_is_good_and_empty() {
        let value = DataValue::default();
        assert!(!value.has_value());
        assert!(value.status.is_good());
    }
}
