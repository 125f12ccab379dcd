use crate::group::GroupIndex;
use crate::mask::NullMask;

/// Write each group's result into every row position belonging to that group.
///
/// The output has [`GroupIndex::row_count`] entries and is addressed by absolute row position, so
/// it follows the original row order whatever order the groups are visited in. A rolling window
/// writes only to its anchor row, since windows overlap. Rows not covered by any group, and rows
/// of groups whose result is null, are null.
pub fn broadcast<T: Clone>(
    results: &[Option<T>],
    index: &GroupIndex,
    zero: T,
) -> (Vec<T>, NullMask) {
    debug_assert_eq!(results.len(), index.len());
    let rows = index.row_count();
    let mut values = vec![zero; rows];
    let mut nulls = NullMask::all_null(rows);

    for (group, result) in index.groups().iter().zip(results) {
        let Some(result) = result else {
            continue;
        };
        match group.anchor() {
            Some(row) => {
                values[row] = result.clone();
                nulls.set(row, false);
            }
            None => {
                for &row in group.rows() {
                    values[row] = result.clone();
                    nulls.set(row, false);
                }
            }
        }
    }

    (values, nulls)
}

/// One output row per group, in group order; null results keep the zero value.
pub fn collapse<T: Clone>(results: Vec<Option<T>>, zero: T) -> (Vec<T>, NullMask) {
    let nulls: NullMask = results.iter().map(Option::is_none).collect();
    let values = results
        .into_iter()
        .map(|r| r.unwrap_or_else(|| zero.clone()))
        .collect();
    (values, nulls)
}
