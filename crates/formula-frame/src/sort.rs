//! Multi-key stable sort.
//!
//! Keys are applied from least to most significant, each as a stable single-key sort over the
//! permutation built so far. Ties at a more significant key therefore keep exactly the order the
//! less significant keys produced, which gives full lexicographic ordering without an N-ary
//! comparator.
//!
//! Null rows compare as the zero value their view stores (`0`, `""` or the zero instant).

use ordered_float::OrderedFloat;
use std::cmp::Ordering;

use crate::container::Container;
use crate::error::{check_positions, FrameError, FrameResult};
use crate::scalar::ElementKind;

/// One sort key: which column, which view to compare it in, and its direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    /// Comparison kind; `None` uses the column's natural kind.
    pub hint: Option<ElementKind>,
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            hint: None,
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            descending: true,
            ..Self::asc(column)
        }
    }

    pub fn with_hint(mut self, kind: ElementKind) -> Self {
        self.hint = Some(kind);
        self
    }
}

/// Stable-sort `permutation` by a single container.
///
/// Every position must address a row of `container`; otherwise nothing is reordered and
/// `RowOutOfBounds` is returned.
pub fn sort_pass(
    permutation: &mut [usize],
    container: &Container,
    kind: ElementKind,
    descending: bool,
) -> FrameResult<()> {
    check_positions(permutation, container.len())?;
    let direct = |ord: Ordering| if descending { ord.reverse() } else { ord };
    match kind {
        ElementKind::Numeric => {
            let view = container.as_numeric();
            permutation.sort_by(|&a, &b| {
                direct(OrderedFloat(view.values[a]).cmp(&OrderedFloat(view.values[b])))
            });
        }
        ElementKind::Text => {
            let text = container.formatted();
            permutation.sort_by(|&a, &b| direct(text[a].as_ref().cmp(text[b].as_ref())));
        }
        ElementKind::Chronological => {
            let view = container.as_chronological();
            permutation.sort_by(|&a, &b| direct(view.values[a].cmp(&view.values[b])));
        }
    }
    Ok(())
}

fn resolve<'a>(containers: &[&'a Container], name: &str) -> FrameResult<&'a Container> {
    containers
        .iter()
        .copied()
        .find(|c| c.name() == Some(name))
        .ok_or_else(|| FrameError::UnknownColumn(name.to_owned()))
}

/// Compute the row permutation ordering `containers` by `specs` (first spec most significant).
pub fn sort_permutation(containers: &[&Container], specs: &[SortSpec]) -> FrameResult<Vec<usize>> {
    let rows = containers.first().map_or(0, |c| c.len());
    let mut keyed = Vec::with_capacity(specs.len());
    for spec in specs {
        let container = resolve(containers, &spec.column)?;
        if container.len() != rows {
            return Err(FrameError::length_mismatch(
                format!("sort column {}", spec.column),
                rows,
                container.len(),
            ));
        }
        keyed.push((container, spec));
    }

    let mut permutation: Vec<usize> = (0..rows).collect();
    for (container, spec) in keyed.into_iter().rev() {
        let kind = spec.hint.unwrap_or_else(|| container.natural_kind());
        log::debug!(
            "sort pass on {} as {kind:?} (descending: {})",
            spec.column,
            spec.descending
        );
        sort_pass(&mut permutation, container, kind, spec.descending)?;
    }
    Ok(permutation)
}
