//! Coercion views from any backing representation to the three canonical element kinds.
//!
//! Every view allocates a fresh array and null mask; the source container is never touched.
//! A value that has no meaning in the target kind degrades to null with the target's zero value
//! rather than failing the whole view.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;
use std::sync::Arc;

use crate::config::RFC3339;
use crate::container::Container;
use crate::mask::NullMask;
use crate::scalar::{format_datetime, format_number, zero_instant, ElementKind, Scalar};
use crate::values::Values;

/// A coerced copy of a container: values in the target representation plus their null mask.
///
/// Null rows hold the target type's zero value (`0.0`, `""` or the zero instant).
#[derive(Clone, Debug, PartialEq)]
pub struct View<T> {
    pub values: Vec<T>,
    pub nulls: NullMask,
}

impl<T> View<T> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value at `row`, or `None` when the row is null or out of range.
    pub fn get(&self, row: usize) -> Option<&T> {
        if self.nulls.get(row) {
            return None;
        }
        self.values.get(row)
    }
}

/// Binds a canonical [`ElementKind`] to its native Rust type.
///
/// Group and sort code is written once against this trait instead of once per kind.
pub trait CanonicalType {
    type Native: Clone + fmt::Debug;
    const KIND: ElementKind;

    fn zero() -> Self::Native;
    fn view(container: &Container) -> View<Self::Native>;
    fn into_values(values: Vec<Self::Native>) -> Values;
}

#[derive(Clone, Copy, Debug)]
pub struct NumericType;

#[derive(Clone, Copy, Debug)]
pub struct TextType;

#[derive(Clone, Copy, Debug)]
pub struct ChronoType;

impl CanonicalType for NumericType {
    type Native = f64;
    const KIND: ElementKind = ElementKind::Numeric;

    fn zero() -> f64 {
        0.0
    }

    fn view(container: &Container) -> View<f64> {
        container.as_numeric()
    }

    fn into_values(values: Vec<f64>) -> Values {
        Values::Numeric(values)
    }
}

impl CanonicalType for TextType {
    type Native = Arc<str>;
    const KIND: ElementKind = ElementKind::Text;

    fn zero() -> Arc<str> {
        Arc::from("")
    }

    fn view(container: &Container) -> View<Arc<str>> {
        container.as_text()
    }

    fn into_values(values: Vec<Arc<str>>) -> Values {
        Values::Text(values)
    }
}

impl CanonicalType for ChronoType {
    type Native = NaiveDateTime;
    const KIND: ElementKind = ElementKind::Chronological;

    fn zero() -> NaiveDateTime {
        zero_instant()
    }

    fn view(container: &Container) -> View<NaiveDateTime> {
        container.as_chronological()
    }

    fn into_values(values: Vec<NaiveDateTime>) -> Values {
        Values::DateTime(values)
    }
}

fn build<T: Clone>(
    values: &Values,
    nulls: &NullMask,
    target: ElementKind,
    zero: T,
    convert: impl Fn(usize) -> Option<T>,
) -> View<T> {
    let len = values.len();
    let mut out = Vec::with_capacity(len);
    let mut out_nulls = NullMask::with_capacity(len);
    for row in 0..len {
        if nulls.get(row) {
            out.push(zero.clone());
            out_nulls.push(true);
            continue;
        }
        match convert(row) {
            Some(v) => {
                out.push(v);
                out_nulls.push(false);
            }
            None => {
                log::trace!(
                    "row {row}: {} value has no {target:?} meaning; treating as null",
                    values.type_name()
                );
                out.push(zero.clone());
                out_nulls.push(true);
            }
        }
    }
    View {
        values: out,
        nulls: out_nulls,
    }
}

pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

pub(crate) fn parse_datetime(text: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let text = text.trim();
    formats.iter().find_map(|format| {
        if format == RFC3339 {
            return DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(text, format).ok().or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    })
}

fn scalar_to_number(value: &Scalar) -> Option<f64> {
    match value {
        Scalar::Number(v) => Some(*v).filter(|v| !v.is_nan()),
        Scalar::Integer(v) => Some(*v as f64),
        Scalar::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
        Scalar::Text(v) => parse_number(v),
        Scalar::Null | Scalar::DateTime(_) | Scalar::Opaque(_) => None,
    }
}

fn scalar_to_text(value: &Scalar) -> Option<Arc<str>> {
    match value {
        Scalar::Null => None,
        Scalar::Text(v) => Some(v.clone()),
        Scalar::Number(v) => Some(Arc::from(format_number(*v))),
        other => Some(Arc::from(other.to_string())),
    }
}

fn scalar_to_datetime(value: &Scalar, formats: &[String]) -> Option<NaiveDateTime> {
    match value {
        Scalar::DateTime(v) => Some(*v),
        Scalar::Text(v) => parse_datetime(v, formats),
        _ => None,
    }
}

pub(crate) fn to_numeric(values: &Values, nulls: &NullMask) -> View<f64> {
    let kind = ElementKind::Numeric;
    match values {
        Values::Numeric(v) => build(values, nulls, kind, 0.0, |r| {
            Some(v[r]).filter(|x| !x.is_nan())
        }),
        Values::Integer(v) => build(values, nulls, kind, 0.0, |r| Some(v[r] as f64)),
        Values::Boolean(v) => build(values, nulls, kind, 0.0, |r| {
            Some(if v[r] { 1.0 } else { 0.0 })
        }),
        Values::Text(v) => build(values, nulls, kind, 0.0, |r| parse_number(&v[r])),
        Values::DateTime(_) => build(values, nulls, kind, 0.0, |_| None),
        Values::Mixed(v) => build(values, nulls, kind, 0.0, |r| scalar_to_number(&v[r])),
    }
}

pub(crate) fn to_text(values: &Values, nulls: &NullMask) -> View<Arc<str>> {
    let kind = ElementKind::Text;
    let empty: Arc<str> = Arc::from("");
    match values {
        Values::Numeric(v) => build(values, nulls, kind, empty, |r| {
            Some(v[r])
                .filter(|x| !x.is_nan())
                .map(|x| Arc::from(format_number(x)))
        }),
        Values::Integer(v) => build(values, nulls, kind, empty, |r| {
            Some(Arc::from(v[r].to_string()))
        }),
        Values::Boolean(v) => build(values, nulls, kind, empty, |r| {
            Some(Arc::from(v[r].to_string()))
        }),
        Values::Text(v) => build(values, nulls, kind, empty, |r| Some(v[r].clone())),
        Values::DateTime(v) => build(values, nulls, kind, empty, |r| {
            Some(Arc::from(format_datetime(&v[r])))
        }),
        Values::Mixed(v) => build(values, nulls, kind, empty, |r| scalar_to_text(&v[r])),
    }
}

pub(crate) fn to_datetime(
    values: &Values,
    nulls: &NullMask,
    formats: &[String],
) -> View<NaiveDateTime> {
    let kind = ElementKind::Chronological;
    let zero = zero_instant();
    match values {
        Values::DateTime(v) => build(values, nulls, kind, zero, |r| Some(v[r])),
        Values::Text(v) => build(values, nulls, kind, zero, |r| {
            parse_datetime(&v[r], formats)
        }),
        Values::Mixed(v) => build(values, nulls, kind, zero, |r| {
            scalar_to_datetime(&v[r], formats)
        }),
        Values::Numeric(_) | Values::Integer(_) | Values::Boolean(_) => {
            build(values, nulls, kind, zero, |_| None)
        }
    }
}
