//! Reducers turn one group's rows into a single value.
//!
//! A reducer sees the whole backing array, its null mask and the group's row positions, so it
//! can decide how to treat nulls itself. Returning `None` produces a null cell.

use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use std::sync::Arc;

use crate::mask::NullMask;

pub trait Reducer<T> {
    fn reduce(&self, values: &[T], nulls: &NullMask, rows: &[usize]) -> Option<T>;
}

fn non_null<'a, T>(
    values: &'a [T],
    nulls: &'a NullMask,
    rows: &'a [usize],
) -> impl Iterator<Item = &'a T> + 'a {
    rows.iter()
        .filter(move |&&row| !nulls.get(row))
        .map(move |&row| &values[row])
}

/// Built-in numeric reducers. Every variant yields null for a group with no non-null rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericReducer {
    Sum,
    Mean,
    Median,
    /// Population standard deviation.
    Std,
    /// Number of non-null rows.
    Count,
    Min,
    Max,
}

impl Reducer<f64> for NumericReducer {
    fn reduce(&self, values: &[f64], nulls: &NullMask, rows: &[usize]) -> Option<f64> {
        let valid: Vec<f64> = non_null(values, nulls, rows).copied().collect();
        if valid.is_empty() {
            return None;
        }
        let n = valid.len() as f64;
        let out = match self {
            NumericReducer::Sum => valid.iter().sum(),
            NumericReducer::Mean => valid.iter().sum::<f64>() / n,
            NumericReducer::Median => median(valid),
            NumericReducer::Std => {
                let mean = valid.iter().sum::<f64>() / n;
                let var = valid.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
                var.sqrt()
            }
            NumericReducer::Count => n,
            NumericReducer::Min => valid.iter().copied().map(OrderedFloat).min()?.0,
            NumericReducer::Max => valid.iter().copied().map(OrderedFloat).max()?.0,
        };
        Some(out)
    }
}

fn median(mut valid: Vec<f64>) -> f64 {
    valid.sort_by(|a, b| a.total_cmp(b));
    let mid = valid.len() / 2;
    if valid.len() % 2 == 0 {
        (valid[mid - 1] + valid[mid]) / 2.0
    } else {
        valid[mid]
    }
}

/// Built-in reducers over text, in row order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextReducer {
    First,
    Last,
}

impl Reducer<Arc<str>> for TextReducer {
    fn reduce(&self, values: &[Arc<str>], nulls: &NullMask, rows: &[usize]) -> Option<Arc<str>> {
        let mut valid = non_null(values, nulls, rows);
        match self {
            TextReducer::First => valid.next().cloned(),
            TextReducer::Last => valid.last().cloned(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChronoReducer {
    Earliest,
    Latest,
}

impl Reducer<NaiveDateTime> for ChronoReducer {
    fn reduce(
        &self,
        values: &[NaiveDateTime],
        nulls: &NullMask,
        rows: &[usize],
    ) -> Option<NaiveDateTime> {
        let valid = non_null(values, nulls, rows).copied();
        match self {
            ChronoReducer::Earliest => valid.min(),
            ChronoReducer::Latest => valid.max(),
        }
    }
}

/// Wraps a closure taking the full array, null mask and the group's positions.
pub struct RawReducer<F>(pub F);

impl<T, F> Reducer<T> for RawReducer<F>
where
    F: Fn(&[T], &NullMask, &[usize]) -> Option<T>,
{
    fn reduce(&self, values: &[T], nulls: &NullMask, rows: &[usize]) -> Option<T> {
        (self.0)(values, nulls, rows)
    }
}

/// Wraps a closure that only receives the group's non-null values, in row order.
///
/// A group without any non-null value produces null without calling the closure.
pub struct NonNullReducer<F>(pub F);

impl<T, F> Reducer<T> for NonNullReducer<F>
where
    T: Clone,
    F: Fn(&[T]) -> T,
{
    fn reduce(&self, values: &[T], nulls: &NullMask, rows: &[usize]) -> Option<T> {
        let valid: Vec<T> = non_null(values, nulls, rows).cloned().collect();
        if valid.is_empty() {
            return None;
        }
        Some((self.0)(&valid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(reducer: NumericReducer, values: &[f64], nulls: &[bool]) -> Option<f64> {
        let rows: Vec<usize> = (0..values.len()).collect();
        reducer.reduce(values, &NullMask::from_bools(nulls), &rows)
    }

    #[test]
    fn numeric_reducers_skip_nulls() {
        let values = [1.0, 100.0, 3.0, 4.0];
        let nulls = [false, true, false, false];
        assert_eq!(run(NumericReducer::Sum, &values, &nulls), Some(8.0));
        assert_eq!(run(NumericReducer::Count, &values, &nulls), Some(3.0));
        assert_eq!(run(NumericReducer::Median, &values, &nulls), Some(3.0));
        assert_eq!(run(NumericReducer::Min, &values, &nulls), Some(1.0));
        assert_eq!(run(NumericReducer::Max, &values, &nulls), Some(4.0));
    }

    #[test]
    fn median_of_even_count_averages_middle_pair() {
        assert_eq!(
            run(NumericReducer::Median, &[4.0, 1.0, 3.0, 2.0], &[false; 4]),
            Some(2.5)
        );
    }

    #[test]
    fn std_is_population() {
        let got = run(NumericReducer::Std, &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], &[false; 8]);
        assert_eq!(got, Some(2.0));
    }

    #[test]
    fn empty_group_is_null() {
        assert_eq!(NumericReducer::Sum.reduce(&[1.0], &NullMask::all_valid(1), &[]), None);
        assert_eq!(
            TextReducer::First.reduce(&[Arc::from("a")], &NullMask::all_null(1), &[0]),
            None
        );
    }
}
