use chrono::NaiveDateTime;
use std::fmt;
use std::sync::Arc;

/// The three canonical element kinds every container can be viewed as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Numeric,
    Text,
    Chronological,
}

/// Format used when rendering timestamps as text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The zero instant: the stored value of a null timestamp, and the sentinel treated as null on
/// ingestion.
pub fn zero_instant() -> NaiveDateTime {
    NaiveDateTime::default()
}

pub fn format_number(value: f64) -> String {
    value.to_string()
}

pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// An element whose concrete type the engine does not know.
///
/// Opaque values can only render themselves as text; coercing one to a numeric or
/// chronological view yields a null.
#[derive(Clone)]
pub struct OpaqueValue(Arc<dyn fmt::Display + Send + Sync>);

impl OpaqueValue {
    pub fn new(value: impl fmt::Display + Send + Sync + 'static) -> Self {
        Self(Arc::new(value))
    }
}

impl fmt::Display for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.0)
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.to_string() == other.to_string()
    }
}

/// A single cell value.
///
/// Mixed containers store one `Scalar` per row and are coerced element by element.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Text(Arc<str>),
    DateTime(NaiveDateTime),
    Opaque(OpaqueValue),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn text(value: impl AsRef<str>) -> Self {
        Scalar::Text(Arc::from(value.as_ref()))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Number(v) => write!(f, "{v}"),
            Scalar::Integer(v) => write!(f, "{v}"),
            Scalar::Boolean(v) => write!(f, "{v}"),
            Scalar::Text(v) => f.write_str(v),
            Scalar::DateTime(v) => f.write_str(&format_datetime(v)),
            Scalar::Opaque(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::text(value)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        Scalar::DateTime(value)
    }
}
