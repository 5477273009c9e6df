//! Length strings with unit suffixes.
//!
//! Meters are the canonical unit for every length in the viewer. Parsing
//! accepts inputs like `"3m"`, `"150cm"` or `" 2.5 m "`; formatting picks the
//! unit that keeps the displayed number readable and rounds to three
//! significant digits.

const SIGNIFICANT_DIGITS: i32 = 3;

/// Lengths below this many meters display as zero.
const DISPLAY_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Millimeter,
    Centimeter,
    Decimeter,
    Meter,
    Kilometer,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Millimeter,
        LengthUnit::Centimeter,
        LengthUnit::Decimeter,
        LengthUnit::Meter,
        LengthUnit::Kilometer,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Decimeter => "dm",
            Self::Meter => "m",
            Self::Kilometer => "km",
        }
    }

    /// Case-insensitive lookup of a unit suffix.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.suffix().eq_ignore_ascii_case(suffix))
    }

    /// Converts a value expressed in this unit to meters.
    ///
    /// Sub-meter units divide instead of multiplying by a fraction so that
    /// values like `250cm` land exactly on `2.5`.
    pub fn to_meters(self, value: f64) -> f64 {
        match self {
            Self::Millimeter => value / 1000.0,
            Self::Centimeter => value / 100.0,
            Self::Decimeter => value / 10.0,
            Self::Meter => value,
            Self::Kilometer => value * 1000.0,
        }
    }

    pub fn from_meters(self, meters: f64) -> f64 {
        match self {
            Self::Millimeter => meters * 1000.0,
            Self::Centimeter => meters * 100.0,
            Self::Decimeter => meters * 10.0,
            Self::Meter => meters,
            Self::Kilometer => meters / 1000.0,
        }
    }

    /// Unit used when displaying a length of the given magnitude.
    /// Decimeters are accepted on input but never chosen for display.
    fn for_display(meters: f64) -> Self {
        let meters = meters.abs();
        if meters >= 1000.0 {
            Self::Kilometer
        } else if meters >= 1.0 {
            Self::Meter
        } else if meters >= 0.01 {
            Self::Centimeter
        } else {
            Self::Millimeter
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LengthParseError {
    #[error("length is empty")]
    Empty,
    #[error("no number before the unit in {input:?}")]
    MissingNumber { input: String },
    #[error("{number:?} is not a valid number")]
    InvalidNumber { number: String },
    #[error("missing unit after {number:?}")]
    MissingUnit { number: String },
    #[error("unknown unit {unit:?}")]
    UnknownUnit { unit: String },
    #[error("length must not be negative")]
    Negative,
}

/// Parses a length string into meters, reporting why malformed input was rejected.
pub fn parse_length(input: &str) -> Result<f64, LengthParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LengthParseError::Empty);
    }

    let split = trimmed
        .find(|c: char| c.is_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let number = number.trim();
    let unit = unit.trim();

    if number.is_empty() {
        return Err(LengthParseError::MissingNumber {
            input: trimmed.to_string(),
        });
    }
    let value: f64 = number
        .parse()
        .map_err(|_| LengthParseError::InvalidNumber {
            number: number.to_string(),
        })?;
    if !value.is_finite() {
        return Err(LengthParseError::InvalidNumber {
            number: number.to_string(),
        });
    }
    if value < 0.0 {
        return Err(LengthParseError::Negative);
    }
    if unit.is_empty() {
        return Err(LengthParseError::MissingUnit {
            number: number.to_string(),
        });
    }
    let unit = LengthUnit::from_suffix(unit).ok_or_else(|| LengthParseError::UnknownUnit {
        unit: unit.to_string(),
    })?;

    let meters = unit.to_meters(value);
    if !meters.is_finite() {
        return Err(LengthParseError::InvalidNumber {
            number: number.to_string(),
        });
    }
    Ok(meters)
}

/// Parses a length string into meters.
///
/// `None` is the not-a-number sentinel: empty input, a missing or unknown
/// unit, and an unparsable number all yield it. Malformed input is expected
/// while the user is typing, so the reason is only logged at trace level.
pub fn string_to_meters(input: &str) -> Option<f64> {
    match parse_length(input) {
        Ok(meters) => Some(meters),
        Err(err) => {
            log::trace!("Rejected length {:?}: {}", input, err);
            None
        }
    }
}

/// Formats meters as a compact string such as `"2m"`, `"45.6cm"` or `"1.23km"`.
///
/// The output always parses back through [`string_to_meters`] to the
/// rounded value.
pub fn meters_to_string(meters: f64) -> String {
    if !meters.is_finite() {
        return "-".to_string();
    }
    if meters.abs() < DISPLAY_EPSILON {
        return format!("0{}", LengthUnit::Meter.suffix());
    }
    let rounded = round_significant(meters, SIGNIFICANT_DIGITS);
    if rounded == 0.0 {
        return format!("0{}", LengthUnit::Meter.suffix());
    }
    let unit = LengthUnit::for_display(rounded);
    let value = unit.from_meters(rounded);
    format!(
        "{}{}",
        format_significant(value, SIGNIFICANT_DIGITS),
        unit.suffix()
    )
}

fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10f64.powi(digits - 1 - magnitude);
    (value * scale).round() / scale
}

fn format_significant(value: f64, digits: i32) -> String {
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
