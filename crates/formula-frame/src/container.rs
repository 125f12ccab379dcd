#![forbid(unsafe_code)]

use chrono::NaiveDateTime;
use std::any::Any;
use std::cell::OnceCell;
use std::collections::HashSet;
use std::sync::Arc;

use crate::coerce::{self, View};
use crate::config::FrameConfig;
use crate::error::{check_positions, FrameError, FrameResult};
use crate::mask::NullMask;
use crate::null_model::NullModel;
use crate::scalar::{ElementKind, Scalar};
use crate::values::Values;

/// A single typed, nullable column.
///
/// `values` and `nulls` always have the same length. The per-row text used for grouping keys is
/// computed lazily and dropped by every operation that changes the rows (subset, drop, sort,
/// cast), so it is never observed stale.
#[derive(Debug)]
pub struct Container {
    values: Values,
    nulls: NullMask,
    name: Option<String>,
    datetime_formats: Arc<[String]>,
    text_cache: OnceCell<Vec<Arc<str>>>,
}

impl Clone for Container {
    /// Deep copy with an empty text cache.
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            nulls: self.nulls.clone(),
            name: self.name.clone(),
            datetime_formats: self.datetime_formats.clone(),
            text_cache: OnceCell::new(),
        }
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.values == other.values && self.nulls == other.nulls
    }
}

impl Container {
    /// Ingest `values` with the default [`FrameConfig`], detecting nulls from sentinels.
    pub fn new(values: impl Into<Values>) -> Self {
        Self::with_config(values, &FrameConfig::default())
    }

    pub fn with_config(values: impl Into<Values>, config: &FrameConfig) -> Self {
        let values = values.into();
        let nulls = NullModel::new(config).detect(&values);
        Self::from_parts(values, nulls, config)
    }

    /// Ingest `values` with a caller-supplied null mask (`true` = null).
    pub fn with_mask(values: impl Into<Values>, mask: Vec<bool>) -> FrameResult<Self> {
        let values = values.into();
        if mask.len() != values.len() {
            return Err(FrameError::length_mismatch(
                "null mask",
                values.len(),
                mask.len(),
            ));
        }
        Ok(Self::from_parts(
            values,
            NullMask::from_bools(&mask),
            &FrameConfig::default(),
        ))
    }

    /// Ingest a vector whose element type is only known at runtime.
    ///
    /// Fails with [`FrameError::UnsupportedElementType`] when `T` has no representation.
    pub fn from_any<T: Any>(
        values: Vec<T>,
        mask: Option<Vec<bool>>,
        config: &FrameConfig,
    ) -> FrameResult<Self> {
        let values = Values::from_any(values)?;
        let nulls = match mask {
            Some(mask) if mask.len() != values.len() => {
                return Err(FrameError::length_mismatch(
                    "null mask",
                    values.len(),
                    mask.len(),
                ))
            }
            Some(mask) => NullMask::from_bools(&mask),
            None => NullModel::new(config).detect(&values),
        };
        Ok(Self::from_parts(values, nulls, config))
    }

    pub(crate) fn from_parts(values: Values, nulls: NullMask, config: &FrameConfig) -> Self {
        debug_assert_eq!(values.len(), nulls.len());
        Self {
            values,
            nulls,
            name: None,
            datetime_formats: config.datetime_formats.clone().into(),
            text_cache: OnceCell::new(),
        }
    }

    /// Build a result container that shares `self`'s name and parse settings.
    pub(crate) fn derive(&self, values: Values, nulls: NullMask) -> Self {
        debug_assert_eq!(values.len(), nulls.len());
        Self {
            values,
            nulls,
            name: self.name.clone(),
            datetime_formats: self.datetime_formats.clone(),
            text_cache: OnceCell::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn null_mask(&self) -> &NullMask {
        &self.nulls
    }

    pub fn natural_kind(&self) -> ElementKind {
        self.values.natural_kind()
    }

    pub fn is_null(&self, row: usize) -> bool {
        self.nulls.get(row)
    }

    pub fn null_count(&self) -> usize {
        self.nulls.null_count()
    }

    /// The cell at `row`; null rows read as [`Scalar::Null`].
    pub fn get(&self, row: usize) -> FrameResult<Scalar> {
        check_positions(&[row], self.len())?;
        if self.nulls.get(row) {
            return Ok(Scalar::Null);
        }
        Ok(self.values.scalar(row))
    }

    pub fn as_numeric(&self) -> View<f64> {
        coerce::to_numeric(&self.values, &self.nulls)
    }

    pub fn as_text(&self) -> View<Arc<str>> {
        View {
            values: self.formatted().to_vec(),
            nulls: self.nulls.clone(),
        }
    }

    pub fn as_chronological(&self) -> View<NaiveDateTime> {
        coerce::to_datetime(&self.values, &self.nulls, &self.datetime_formats)
    }

    /// Per-row text, computed once per generation of the rows. Null rows are `""`.
    pub fn formatted(&self) -> &[Arc<str>] {
        self.text_cache
            .get_or_init(|| coerce::to_text(&self.values, &self.nulls).values)
    }

    pub fn has_cached_text(&self) -> bool {
        self.text_cache.get().is_some()
    }

    fn replace_rows(&mut self, values: Values, nulls: NullMask) {
        debug_assert_eq!(values.len(), nulls.len());
        self.values = values;
        self.nulls = nulls;
        self.text_cache.take();
    }

    /// A new container holding the rows at `positions`, in that order.
    pub fn take(&self, positions: &[usize]) -> FrameResult<Self> {
        check_positions(positions, self.len())?;
        Ok(self.derive(self.values.take(positions), self.nulls.take(positions)))
    }

    /// Keep only the rows at `positions`, in that order.
    pub fn subset(&mut self, positions: &[usize]) -> FrameResult<()> {
        check_positions(positions, self.len())?;
        let values = self.values.take(positions);
        let nulls = self.nulls.take(positions);
        self.replace_rows(values, nulls);
        Ok(())
    }

    /// Remove the rows at `positions`; the remaining rows keep their order.
    pub fn drop_rows(&mut self, positions: &[usize]) -> FrameResult<()> {
        check_positions(positions, self.len())?;
        let dropped: HashSet<usize> = positions.iter().copied().collect();
        let keep: Vec<usize> = (0..self.len()).filter(|r| !dropped.contains(r)).collect();
        self.subset(&keep)
    }

    pub fn drop_nulls(&mut self) {
        if !self.nulls.any_null() {
            return;
        }
        let keep: Vec<usize> = (0..self.len()).filter(|&r| !self.nulls.get(r)).collect();
        let values = self.values.take(&keep);
        self.replace_rows(values, NullMask::all_valid(keep.len()));
    }

    /// Reorder rows so that row `i` becomes the old row `permutation[i]`.
    pub fn apply_permutation(&mut self, permutation: &[usize]) -> FrameResult<()> {
        validate_permutation(permutation, self.len())?;
        self.subset(permutation)
    }

    /// Replace the backing array with its view in `kind`. Values with no meaning in `kind` become
    /// null.
    pub fn cast(&mut self, kind: ElementKind) {
        log::debug!(
            "casting {} container {:?} to {kind:?}",
            self.values.type_name(),
            self.name
        );
        let (values, nulls) = match kind {
            ElementKind::Numeric => {
                let view = self.as_numeric();
                (Values::Numeric(view.values), view.nulls)
            }
            ElementKind::Text => {
                let view = coerce::to_text(&self.values, &self.nulls);
                (Values::Text(view.values), view.nulls)
            }
            ElementKind::Chronological => {
                let view = self.as_chronological();
                (Values::DateTime(view.values), view.nulls)
            }
        };
        self.replace_rows(values, nulls);
    }

    /// An independent deep copy; the text cache starts empty.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

pub(crate) fn validate_permutation(permutation: &[usize], len: usize) -> FrameResult<()> {
    if permutation.len() != len {
        return Err(FrameError::length_mismatch(
            "permutation",
            len,
            permutation.len(),
        ));
    }
    let mut seen = vec![false; len];
    for &row in permutation {
        match seen.get_mut(row) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(FrameError::InvalidPermutation(format!(
                    "row {row} appears more than once"
                )))
            }
            None => return Err(FrameError::RowOutOfBounds { row, len }),
        }
    }
    Ok(())
}
