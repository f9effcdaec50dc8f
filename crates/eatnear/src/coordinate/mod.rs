//! Coordinate input validation.
//!
//! A [`CoordinateInput`] keeps whatever the user typed, verbatim, so it can be
//! redisplayed, alongside the parsed value when (and only when) the text is a
//! finite number inside the axis range. Submission is gated on
//! [`Coordinates::try_from_inputs`], which only succeeds for two valid inputs.

use std::fmt;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Which half of a coordinate pair an input belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub const fn min(self) -> f64 {
        match self {
            Self::Latitude => MIN_LATITUDE,
            Self::Longitude => MIN_LONGITUDE,
        }
    }

    pub const fn max(self) -> f64 {
        match self {
            Self::Latitude => MAX_LATITUDE,
            Self::Longitude => MAX_LONGITUDE,
        }
    }

    /// Inline message shown under an invalid field.
    pub const fn error_message(self) -> &'static str {
        match self {
            Self::Latitude => "Incorrect latitude ([-90, 90])",
            Self::Longitude => "Incorrect longitude ([-180, 180])",
        }
    }

    /// Parse `raw` and return the value if it is valid on this axis.
    pub fn parse(self, raw: &str) -> Option<f64> {
        parse_within(raw, self.min(), self.max())
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latitude => write!(f, "latitude"),
            Self::Longitude => write!(f, "longitude"),
        }
    }
}

/// Parse `raw` as a finite number within `[min, max]`.
///
/// Surrounding whitespace is ignored; an empty (or all-whitespace) string is
/// never valid.
pub fn parse_within(raw: &str, min: f64, max: f64) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (min..=max).contains(value))
}

/// True iff `raw` is non-empty, parses as a finite number and lies in `[min, max]`.
pub fn validate(raw: &str, min: f64, max: f64) -> bool {
    parse_within(raw, min, max).is_some()
}

pub fn validate_latitude(raw: &str) -> bool {
    validate(raw, MIN_LATITUDE, MAX_LATITUDE)
}

pub fn validate_longitude(raw: &str) -> bool {
    validate(raw, MIN_LONGITUDE, MAX_LONGITUDE)
}

/// A single form field: the raw text plus its validity.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateInput {
    axis: Axis,
    raw: String,
    value: Option<f64>,
}

impl CoordinateInput {
    pub fn new(axis: Axis, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = axis.parse(&raw);
        Self { axis, raw, value }
    }

    /// Input filled from a number rather than typed text, e.g. a device position.
    pub fn from_value(axis: Axis, value: f64) -> Self {
        Self::new(axis, value.to_string())
    }

    pub fn latitude(raw: impl Into<String>) -> Self {
        Self::new(Axis::Latitude, raw)
    }

    pub fn longitude(raw: impl Into<String>) -> Self {
        Self::new(Axis::Longitude, raw)
    }

    /// Replace the text, revalidating it. Invalid text is still stored.
    pub fn set(&mut self, raw: impl Into<String>) {
        *self = Self::new(self.axis, raw);
    }

    pub fn set_value(&mut self, value: f64) {
        *self = Self::from_value(self.axis, value);
    }

    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Exactly what was typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    pub const fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    /// The inline message to show, if the field is invalid.
    pub const fn error_message(&self) -> Option<&'static str> {
        if self.is_valid() {
            None
        } else {
            Some(self.axis.error_message())
        }
    }
}

impl fmt::Display for CoordinateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.raw)
    }
}

/// Submission blocked because one or both fields are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    invalid: Vec<Axis>,
}

impl ValidationError {
    pub fn invalid_axes(&self) -> &[Axis] {
        &self.invalid
    }

    pub fn is_invalid(&self, axis: Axis) -> bool {
        self.invalid.contains(&axis)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self.invalid.iter().map(|axis| axis.error_message()).collect();
        write!(f, "{}", messages.join("\n"))
    }
}

impl std::error::Error for ValidationError {}

/// A validated latitude/longitude pair, ready to be submitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let lat_ok = latitude.is_finite() && (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude);
        let lon_ok =
            longitude.is_finite() && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude);
        Self::checked(latitude, lat_ok, longitude, lon_ok)
    }

    /// Build from two form fields; fails listing every invalid field.
    pub fn try_from_inputs(
        latitude: &CoordinateInput,
        longitude: &CoordinateInput,
    ) -> Result<Self, ValidationError> {
        Self::checked(
            latitude.value().unwrap_or(f64::NAN),
            latitude.is_valid(),
            longitude.value().unwrap_or(f64::NAN),
            longitude.is_valid(),
        )
    }

    fn checked(
        latitude: f64,
        lat_ok: bool,
        longitude: f64,
        lon_ok: bool,
    ) -> Result<Self, ValidationError> {
        let mut invalid = Vec::new();
        if !lat_ok {
            invalid.push(Axis::Latitude);
        }
        if !lon_ok {
            invalid.push(Axis::Longitude);
        }
        if invalid.is_empty() {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(ValidationError { invalid })
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}
