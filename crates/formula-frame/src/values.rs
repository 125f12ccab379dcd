use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::any::{type_name, Any};
use std::sync::Arc;

use crate::error::{FrameError, FrameResult};
use crate::scalar::{zero_instant, ElementKind, Scalar};

/// The typed array backing a container.
#[derive(Clone, Debug, PartialEq)]
pub enum Values {
    Numeric(Vec<f64>),
    Integer(Vec<i64>),
    Boolean(Vec<bool>),
    Text(Vec<Arc<str>>),
    DateTime(Vec<NaiveDateTime>),
    Mixed(Vec<Scalar>),
}

fn gather<T: Clone>(values: &[T], positions: &[usize]) -> Vec<T> {
    positions.iter().map(|&row| values[row].clone()).collect()
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Numeric(v) => v.len(),
            Values::Integer(v) => v.len(),
            Values::Boolean(v) => v.len(),
            Values::Text(v) => v.len(),
            Values::DateTime(v) => v.len(),
            Values::Mixed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The kind this representation is viewed as when no hint is given.
    pub fn natural_kind(&self) -> ElementKind {
        match self {
            Values::Numeric(_) | Values::Integer(_) | Values::Boolean(_) => ElementKind::Numeric,
            Values::Text(_) | Values::Mixed(_) => ElementKind::Text,
            Values::DateTime(_) => ElementKind::Chronological,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Values::Numeric(_) => "numeric",
            Values::Integer(_) => "integer",
            Values::Boolean(_) => "boolean",
            Values::Text(_) => "text",
            Values::DateTime(_) => "datetime",
            Values::Mixed(_) => "mixed",
        }
    }

    /// Gather rows in `positions` order. Callers validate bounds.
    pub(crate) fn take(&self, positions: &[usize]) -> Values {
        match self {
            Values::Numeric(v) => Values::Numeric(gather(v, positions)),
            Values::Integer(v) => Values::Integer(gather(v, positions)),
            Values::Boolean(v) => Values::Boolean(gather(v, positions)),
            Values::Text(v) => Values::Text(gather(v, positions)),
            Values::DateTime(v) => Values::DateTime(gather(v, positions)),
            Values::Mixed(v) => Values::Mixed(gather(v, positions)),
        }
    }

    /// The cell at `row` ignoring the null mask.
    pub(crate) fn scalar(&self, row: usize) -> Scalar {
        match self {
            Values::Numeric(v) => Scalar::Number(v[row]),
            Values::Integer(v) => Scalar::Integer(v[row]),
            Values::Boolean(v) => Scalar::Boolean(v[row]),
            Values::Text(v) => Scalar::Text(v[row].clone()),
            Values::DateTime(v) => Scalar::DateTime(v[row]),
            Values::Mixed(v) => v[row].clone(),
        }
    }

    /// Convert an arbitrary homogeneous vector into a supported representation.
    ///
    /// This is the ingestion boundary for readers that only know their element type at runtime.
    /// Element types without a representation are rejected immediately.
    pub fn from_any<T: Any>(values: Vec<T>) -> FrameResult<Values> {
        let boxed: Box<dyn Any> = Box::new(values);
        let boxed = match boxed.downcast::<Vec<f64>>() {
            Ok(v) => return Ok(Values::Numeric(*v)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<f32>>() {
            Ok(v) => return Ok(Values::Numeric((*v).into_iter().map(f64::from).collect())),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<i64>>() {
            Ok(v) => return Ok(Values::Integer(*v)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<i32>>() {
            Ok(v) => return Ok(Values::Integer((*v).into_iter().map(i64::from).collect())),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<u32>>() {
            Ok(v) => return Ok(Values::Integer((*v).into_iter().map(i64::from).collect())),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<bool>>() {
            Ok(v) => return Ok(Values::Boolean(*v)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<String>>() {
            Ok(v) => return Ok(Values::from(*v)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<&'static str>>() {
            Ok(v) => return Ok(Values::from(*v)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<Arc<str>>>() {
            Ok(v) => return Ok(Values::Text(*v)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<NaiveDateTime>>() {
            Ok(v) => return Ok(Values::DateTime(*v)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<NaiveDate>>() {
            Ok(v) => {
                return Ok(Values::DateTime(
                    (*v).into_iter()
                        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_else(zero_instant))
                        .collect(),
                ))
            }
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<DateTime<Utc>>>() {
            Ok(v) => return Ok(Values::DateTime(v.iter().map(DateTime::naive_utc).collect())),
            Err(other) => other,
        };
        match boxed.downcast::<Vec<Scalar>>() {
            Ok(v) => Ok(Values::Mixed(*v)),
            Err(_) => Err(FrameError::UnsupportedElementType(type_name::<T>())),
        }
    }
}

impl From<Vec<f64>> for Values {
    fn from(values: Vec<f64>) -> Self {
        Values::Numeric(values)
    }
}

impl From<Vec<i64>> for Values {
    fn from(values: Vec<i64>) -> Self {
        Values::Integer(values)
    }
}

impl From<Vec<bool>> for Values {
    fn from(values: Vec<bool>) -> Self {
        Values::Boolean(values)
    }
}

impl From<Vec<String>> for Values {
    fn from(values: Vec<String>) -> Self {
        Values::Text(values.into_iter().map(Arc::from).collect())
    }
}

impl From<Vec<&str>> for Values {
    fn from(values: Vec<&str>) -> Self {
        Values::Text(values.into_iter().map(Arc::from).collect())
    }
}

impl From<Vec<Arc<str>>> for Values {
    fn from(values: Vec<Arc<str>>) -> Self {
        Values::Text(values)
    }
}

impl From<Vec<NaiveDateTime>> for Values {
    fn from(values: Vec<NaiveDateTime>) -> Self {
        Values::DateTime(values)
    }
}

impl From<Vec<Scalar>> for Values {
    fn from(values: Vec<Scalar>) -> Self {
        Values::Mixed(values)
    }
}
