#![forbid(unsafe_code)]

use crate::config::FrameConfig;
use crate::container::Container;
use crate::error::{check_positions, FrameError, FrameResult};
use crate::group::{group_by, GroupBy};
use crate::sort::{sort_permutation, SortSpec};

/// An ordered collection of row-aligned, named containers.
///
/// The table owns its containers; row operations are applied to every column so they stay
/// aligned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Container>,
    rows: usize,
}

impl Table {
    /// Build a table, naming unnamed columns by position (`"0"`, `"1"`, ...).
    ///
    /// A positional name already taken by another column is skipped for the next free number.
    pub fn new(columns: Vec<Container>) -> FrameResult<Self> {
        let mut table = Table::default();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn push_column(&mut self, mut column: Container) -> FrameResult<()> {
        if self.columns.is_empty() {
            self.rows = column.len();
        } else if column.len() != self.rows {
            return Err(FrameError::length_mismatch(
                format!("column {}", column.name().unwrap_or("<unnamed>")),
                self.rows,
                column.len(),
            ));
        }
        if column.name().is_none() {
            let name = (self.columns.len()..)
                .map(|n| n.to_string())
                .find(|name| self.column(name).is_err())
                .unwrap_or_default();
            column.set_name(name);
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().filter_map(Container::name).collect()
    }

    pub fn columns(&self) -> &[Container] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> FrameResult<&Container> {
        self.columns
            .iter()
            .find(|c| c.name() == Some(name))
            .ok_or_else(|| FrameError::UnknownColumn(name.to_owned()))
    }

    pub fn column_mut(&mut self, name: &str) -> FrameResult<&mut Container> {
        self.columns
            .iter_mut()
            .find(|c| c.name() == Some(name))
            .ok_or_else(|| FrameError::UnknownColumn(name.to_owned()))
    }

    /// Keep only the rows at `positions`, in that order, across every column.
    pub fn subset(&mut self, positions: &[usize]) -> FrameResult<()> {
        check_positions(positions, self.rows)?;
        for column in &mut self.columns {
            column.subset(positions)?;
        }
        self.rows = positions.len();
        Ok(())
    }

    pub fn sort_by(&mut self, specs: &[SortSpec]) -> FrameResult<()> {
        let refs: Vec<&Container> = self.columns.iter().collect();
        let permutation = sort_permutation(&refs, specs)?;
        for column in &mut self.columns {
            column.subset(&permutation)?;
        }
        Ok(())
    }

    pub fn group_by(&self, labels: &[&str], config: &FrameConfig) -> FrameResult<GroupBy> {
        let labels = labels
            .iter()
            .map(|name| self.column(name))
            .collect::<FrameResult<Vec<_>>>()?;
        Ok(GroupBy::new(group_by(&labels, config)?))
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}
