use chrono::NaiveDateTime;

use crate::config::FrameConfig;
use crate::mask::NullMask;
use crate::scalar::{zero_instant, Scalar};
use crate::values::Values;

/// Sentinel rules deciding which ingested values are null.
///
/// - numbers: `NaN`
/// - text: membership in [`FrameConfig::null_tokens`]
/// - timestamps: the zero instant
/// - integers and booleans: never
#[derive(Clone, Copy, Debug)]
pub struct NullModel<'a> {
    config: &'a FrameConfig,
}

impl<'a> NullModel<'a> {
    pub fn new(config: &'a FrameConfig) -> Self {
        Self { config }
    }

    pub fn is_null_number(&self, value: f64) -> bool {
        value.is_nan()
    }

    pub fn is_null_text(&self, value: &str) -> bool {
        self.config.is_null_token(value)
    }

    pub fn is_null_datetime(&self, value: &NaiveDateTime) -> bool {
        *value == zero_instant()
    }

    pub fn is_null_scalar(&self, value: &Scalar) -> bool {
        match value {
            Scalar::Null => true,
            Scalar::Number(v) => self.is_null_number(*v),
            Scalar::Text(v) => self.is_null_text(v),
            Scalar::DateTime(v) => self.is_null_datetime(v),
            Scalar::Integer(_) | Scalar::Boolean(_) | Scalar::Opaque(_) => false,
        }
    }

    pub fn detect(&self, values: &Values) -> NullMask {
        match values {
            Values::Numeric(v) => v.iter().map(|x| self.is_null_number(*x)).collect(),
            Values::Integer(v) => NullMask::all_valid(v.len()),
            Values::Boolean(v) => NullMask::all_valid(v.len()),
            Values::Text(v) => v.iter().map(|s| self.is_null_text(s)).collect(),
            Values::DateTime(v) => v.iter().map(|t| self.is_null_datetime(t)).collect(),
            Values::Mixed(v) => v.iter().map(|s| self.is_null_scalar(s)).collect(),
        }
    }
}
