//! Group membership and reducer dispatch.
//!
//! [`group_by`] partitions rows by the text of one or more label containers. Keys are kept in
//! the order they are first seen while scanning rows `0..N`, not in sorted order, and row
//! positions inside a group keep their original relative order. Rolling windows (see
//! [`crate::fixed_windows`] and [`crate::duration_windows`]) produce the same [`GroupIndex`]
//! shape without keys, so one aggregation path serves both.

use chrono::TimeDelta;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::align;
use crate::coerce::{CanonicalType, ChronoType, NumericType, TextType};
use crate::config::FrameConfig;
use crate::container::Container;
use crate::error::{FrameError, FrameResult};
use crate::mask::NullMask;
use crate::reduce::{
    ChronoReducer, NonNullReducer, NumericReducer, RawReducer, Reducer, TextReducer,
};
use crate::values::Values;
use crate::window;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    key: Option<Arc<str>>,
    rows: Vec<usize>,
    /// The row a rolling window belongs to; its result is written there and nowhere else.
    anchor: Option<usize>,
}

impl Group {
    pub(crate) fn keyed(key: Arc<str>, rows: Vec<usize>) -> Self {
        Self {
            key: Some(key),
            rows,
            anchor: None,
        }
    }

    pub(crate) fn window(anchor: usize, rows: Vec<usize>) -> Self {
        Self {
            key: None,
            rows,
            anchor: Some(anchor),
        }
    }

    /// The group key; `None` for rolling windows.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// The row a rolling window was built for; `None` for keyed groups.
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ordered groups over a set of rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupIndex {
    groups: Vec<Group>,
    /// Rows addressed by `groups` (and length of aligned output).
    row_count: usize,
    /// Length of the containers this index was built from.
    source_len: usize,
    /// Original positions of the rows kept by `having_count`, ascending.
    retained: Option<Vec<usize>>,
}

impl GroupIndex {
    pub(crate) fn new(groups: Vec<Group>, row_count: usize) -> Self {
        Self {
            groups,
            row_count,
            source_len: row_count,
            retained: None,
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Keys in first-seen order. Rolling windows have no keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().filter_map(Group::key)
    }

    pub fn rows(&self, key: &str) -> FrameResult<&[usize]> {
        self.groups
            .iter()
            .find(|g| g.key() == Some(key))
            .map(Group::rows)
            .ok_or_else(|| FrameError::UnknownGroup(key.to_owned()))
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Original row positions that survived [`GroupIndex::having_count`], if it was applied.
    pub fn retained_rows(&self) -> Option<&[usize]> {
        self.retained.as_deref()
    }

    /// Discard every group whose member count fails `predicate`.
    ///
    /// Rows of discarded groups disappear from later output: row positions are re-based onto the
    /// surviving rows, so aligned aggregation yields one row per retained row.
    pub fn having_count(&self, predicate: impl Fn(usize) -> bool) -> GroupIndex {
        let kept: Vec<&Group> = self.groups.iter().filter(|g| predicate(g.len())).collect();

        let mut keep_row = vec![false; self.row_count];
        for group in &kept {
            for &row in group.rows.iter().chain(&group.anchor) {
                keep_row[row] = true;
            }
        }

        let mut new_position = vec![usize::MAX; self.row_count];
        let mut local = Vec::new();
        for (row, keep) in keep_row.into_iter().enumerate() {
            if keep {
                new_position[row] = local.len();
                local.push(row);
            }
        }

        let groups = kept
            .into_iter()
            .map(|g| Group {
                key: g.key.clone(),
                rows: g.rows.iter().map(|&row| new_position[row]).collect(),
                anchor: g.anchor.map(|row| new_position[row]),
            })
            .collect::<Vec<_>>();
        log::debug!(
            "having_count kept {} of {} groups ({} rows)",
            groups.len(),
            self.groups.len(),
            local.len()
        );

        let row_count = local.len();
        let retained = match &self.retained {
            Some(previous) => local.iter().map(|&row| previous[row]).collect(),
            None => local,
        };

        GroupIndex {
            groups,
            row_count,
            source_len: self.source_len,
            retained: Some(retained),
        }
    }
}

/// Partition rows by the joined per-row text of `labels`.
pub fn group_by(labels: &[&Container], config: &FrameConfig) -> FrameResult<GroupIndex> {
    config.validate()?;
    let Some(first) = labels.first() else {
        return Err(FrameError::NoLabels);
    };
    let rows = first.len();
    for label in labels {
        if label.len() != rows {
            return Err(FrameError::length_mismatch(
                format!("label {}", label.name().unwrap_or("<unnamed>")),
                rows,
                label.len(),
            ));
        }
    }

    let texts: Vec<&[Arc<str>]> = labels.iter().map(|c| c.formatted()).collect();
    let mut positions: HashMap<Arc<str>, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut buf = String::new();

    for row in 0..rows {
        let key: Arc<str> = if let [single] = texts.as_slice() {
            single[row].clone()
        } else {
            buf.clear();
            for (i, text) in texts.iter().enumerate() {
                if i > 0 {
                    buf.push_str(&config.key_delimiter);
                }
                buf.push_str(&text[row]);
            }
            if let Some(&idx) = positions.get(buf.as_str()) {
                groups[idx].rows.push(row);
                continue;
            }
            Arc::from(buf.as_str())
        };

        match positions.get(&key) {
            Some(&idx) => groups[idx].rows.push(row),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(Group::keyed(key, vec![row]));
            }
        }
    }

    log::debug!(
        "group_by over {} label(s): {rows} rows -> {} groups",
        labels.len(),
        groups.len()
    );
    Ok(GroupIndex::new(groups, rows))
}

/// A grouping handle that dispatches reducers over a [`GroupIndex`].
///
/// Collapsed mode (the default) yields one row per group. Once [`GroupBy::align`] is called the
/// handle stays aligned: every later aggregate yields one row per (retained) original row.
#[derive(Clone, Debug)]
pub struct GroupBy {
    index: GroupIndex,
    aligned: bool,
}

impl GroupBy {
    pub fn new(index: GroupIndex) -> Self {
        Self {
            index,
            aligned: false,
        }
    }

    /// Fixed-size forward windows over `row_count` rows; always aligned.
    pub fn rolling(row_count: usize, size: usize) -> FrameResult<Self> {
        Ok(Self::new(window::fixed_windows(row_count, size)?).align())
    }

    /// Duration-based forward windows over a chronological column; always aligned.
    pub fn rolling_duration(times: &Container, span: TimeDelta) -> FrameResult<Self> {
        Ok(Self::new(window::duration_windows(times, span)?).align())
    }

    pub fn align(mut self) -> Self {
        self.aligned = true;
        self
    }

    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    pub fn having_count(self, predicate: impl Fn(usize) -> bool) -> Self {
        Self {
            index: self.index.having_count(predicate),
            aligned: self.aligned,
        }
    }

    /// Group keys as a text container shaped like this handle's aggregates.
    ///
    /// Collapsed handles get one key per group; aligned handles get each row's group key, so the
    /// result lines up with every aligned aggregate. Rolling windows have no key and are null.
    pub fn keys_container(&self) -> Container {
        let keys: Vec<Option<Arc<str>>> =
            self.index.groups().iter().map(|g| g.key.clone()).collect();
        let (keys, nulls) = if self.aligned {
            align::broadcast(&keys, &self.index, TextType::zero())
        } else {
            align::collapse(keys, TextType::zero())
        };
        Container::from_parts(Values::Text(keys), nulls, &FrameConfig::default())
    }

    /// Run `reducer` once per group over the `C` view of `values`.
    ///
    /// `values` must have the length of the containers the index was built from.
    pub fn aggregate<C, R>(&self, values: &Container, reducer: &R) -> FrameResult<Container>
    where
        C: CanonicalType,
        R: Reducer<C::Native> + ?Sized,
    {
        if values.len() != self.index.source_len() {
            return Err(FrameError::length_mismatch(
                format!("aggregate input {}", values.name().unwrap_or("<unnamed>")),
                self.index.source_len(),
                values.len(),
            ));
        }

        let source: Cow<'_, Container> = match self.index.retained_rows() {
            Some(rows) => Cow::Owned(values.take(rows)?),
            None => Cow::Borrowed(values),
        };
        let view = C::view(&source);

        let results: Vec<Option<C::Native>> = self
            .index
            .groups()
            .iter()
            .map(|g| reducer.reduce(&view.values, &view.nulls, g.rows()))
            .collect();

        let (out, nulls) = if self.aligned {
            align::broadcast(&results, &self.index, C::zero())
        } else {
            align::collapse(results, C::zero())
        };
        Ok(values.derive(C::into_values(out), nulls))
    }

    pub fn apply_raw<C, F>(&self, values: &Container, f: F) -> FrameResult<Container>
    where
        C: CanonicalType,
        F: Fn(&[C::Native], &NullMask, &[usize]) -> Option<C::Native>,
    {
        self.aggregate::<C, _>(values, &RawReducer(f))
    }

    pub fn apply_non_null<C, F>(&self, values: &Container, f: F) -> FrameResult<Container>
    where
        C: CanonicalType,
        F: Fn(&[C::Native]) -> C::Native,
    {
        self.aggregate::<C, _>(values, &NonNullReducer(f))
    }

    fn numeric(&self, values: &Container, reducer: NumericReducer) -> FrameResult<Container> {
        self.aggregate::<NumericType, _>(values, &reducer)
    }

    pub fn sum(&self, values: &Container) -> FrameResult<Container> {
        self.numeric(values, NumericReducer::Sum)
    }

    pub fn mean(&self, values: &Container) -> FrameResult<Container> {
        self.numeric(values, NumericReducer::Mean)
    }

    pub fn median(&self, values: &Container) -> FrameResult<Container> {
        self.numeric(values, NumericReducer::Median)
    }

    pub fn std(&self, values: &Container) -> FrameResult<Container> {
        self.numeric(values, NumericReducer::Std)
    }

    pub fn count(&self, values: &Container) -> FrameResult<Container> {
        self.numeric(values, NumericReducer::Count)
    }

    pub fn min(&self, values: &Container) -> FrameResult<Container> {
        self.numeric(values, NumericReducer::Min)
    }

    pub fn max(&self, values: &Container) -> FrameResult<Container> {
        self.numeric(values, NumericReducer::Max)
    }

    pub fn first(&self, values: &Container) -> FrameResult<Container> {
        self.aggregate::<TextType, _>(values, &TextReducer::First)
    }

    pub fn last(&self, values: &Container) -> FrameResult<Container> {
        self.aggregate::<TextType, _>(values, &TextReducer::Last)
    }

    pub fn earliest(&self, values: &Container) -> FrameResult<Container> {
        self.aggregate::<ChronoType, _>(values, &ChronoReducer::Earliest)
    }

    pub fn latest(&self, values: &Container) -> FrameResult<Container> {
        self.aggregate::<ChronoType, _>(values, &ChronoReducer::Latest)
    }
}
