// Rolling-window indexers. Each builds one unkeyed group per original row, anchored at that
// row, so the result plugs straight into `GroupBy` in aligned mode.

use chrono::TimeDelta;

use crate::container::Container;
use crate::error::{FrameError, FrameResult};
use crate::group::{Group, GroupIndex};
use crate::scalar::ElementKind;

/// Windows `[i, i + size)` for every row `i`; a window running past the end is empty.
pub fn fixed_windows(row_count: usize, size: usize) -> FrameResult<GroupIndex> {
    if size < 1 {
        return Err(FrameError::InvalidWindowSize(size));
    }

    let groups = (0..row_count)
        .map(|start| match start.checked_add(size) {
            Some(end) if end <= row_count => Group::window(start, (start..end).collect()),
            _ => Group::window(start, Vec::new()),
        })
        .collect();

    log::debug!("built {row_count} fixed windows of size {size}");
    Ok(GroupIndex::new(groups, row_count))
}

/// Windows starting at each row and extending forward while the timestamp delta from the
/// window's first row stays within `span`.
///
/// Timestamps are expected to be non-decreasing; the scan stops at the first row that is out of
/// span, earlier than the anchor, or null. A row whose own timestamp is null gets an empty window.
pub fn duration_windows(times: &Container, span: TimeDelta) -> FrameResult<GroupIndex> {
    if span < TimeDelta::zero() {
        return Err(FrameError::NegativeWindowDuration(span));
    }
    if times.natural_kind() != ElementKind::Chronological {
        return Err(FrameError::NotChronological(
            times.name().unwrap_or("<unnamed>").to_owned(),
        ));
    }

    let view = times.as_chronological();
    let rows = view.len();
    let mut groups = Vec::with_capacity(rows);
    for start in 0..rows {
        let Some(anchor) = view.get(start) else {
            groups.push(Group::window(start, Vec::new()));
            continue;
        };
        let members: Vec<usize> = (start..rows)
            .take_while(|&row| {
                view.get(row)
                    .map(|t| *t - *anchor)
                    .is_some_and(|delta| delta >= TimeDelta::zero() && delta <= span)
            })
            .collect();
        groups.push(Group::window(start, members));
    }

    log::debug!("built {rows} duration windows spanning {span}");
    Ok(GroupIndex::new(groups, rows))
}
