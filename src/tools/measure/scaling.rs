//! Proportional scaling against the reference segment.
//!
//! The mesh is in arbitrary scene units. The user states the real length of
//! the reference segment, and the measured segment is scaled by the same
//! ratio: `measured_local * reference_meters / reference_local`.

use super::session::Segment;
use crate::host::StatusTone;
use crate::units::{meters_to_string, string_to_meters};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayResult {
    MeasurementIncomplete,
    ReferenceIncomplete,
    DegenerateReference,
    InvalidReferenceLength,
    /// The scaled length does not fit in an `f64`.
    OutOfRange,
    /// Real-world length in meters.
    Value(f64),
}

impl DisplayResult {
    pub fn meters(&self) -> Option<f64> {
        match self {
            Self::Value(meters) => Some(*meters),
            _ => None,
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Self::Value(_) => StatusTone::Success,
            _ => StatusTone::Error,
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            Self::MeasurementIncomplete => "Place both measurement points".to_string(),
            Self::ReferenceIncomplete => "Place both reference points".to_string(),
            Self::DegenerateReference => "Reference points must differ".to_string(),
            Self::InvalidReferenceLength => "Invalid reference length".to_string(),
            Self::OutOfRange => "Measurement out of range".to_string(),
            Self::Value(meters) => meters_to_string(*meters),
        }
    }
}

impl fmt::Display for DisplayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Computes the real-world length of `measurement`.
///
/// Checks run in a fixed order (measurement complete, reference complete,
/// reference non-degenerate, reference text parses) so the reported reason
/// is stable when several conditions fail at once. An incomplete measurement
/// segment is therefore reported ahead of a degenerate reference.
pub fn compute_measurement(
    measurement: &Segment,
    reference: &Segment,
    reference_length_text: &str,
) -> DisplayResult {
    let Some(measured_local) = measurement.local_length() else {
        return DisplayResult::MeasurementIncomplete;
    };
    let Some(reference_local) = reference.local_length() else {
        return DisplayResult::ReferenceIncomplete;
    };
    if reference_local == 0.0 {
        return DisplayResult::DegenerateReference;
    }
    let Some(reference_meters) = string_to_meters(reference_length_text) else {
        return DisplayResult::InvalidReferenceLength;
    };

    let meters = measured_local * reference_meters / reference_local;
    if !meters.is_finite() {
        return DisplayResult::OutOfRange;
    }
    DisplayResult::Value(meters)
}
