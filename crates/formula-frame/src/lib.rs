//! In-memory tabular data engine for Formula.
//!
//! This crate focuses on:
//! - Typed, nullable columns ([`Container`]) with sentinel-based null detection and
//!   non-mutating coercion views to numeric, text and chronological values.
//! - Group-by with first-seen key order and two output shapes: collapsed (one row per group)
//!   and aligned (one row per original row).
//! - Multi-key stable sorting built from repeated single-key passes.
//! - Fixed-size and duration-based rolling windows that reuse the group-by reducers.

#![forbid(unsafe_code)]

mod align;
mod coerce;
mod config;
mod container;
mod error;
mod group;
mod mask;
mod null_model;
mod pipeline;
mod reduce;
mod scalar;
mod sort;
mod table;
mod values;
mod window;

pub use crate::align::{broadcast, collapse};
pub use crate::coerce::{CanonicalType, ChronoType, NumericType, TextType, View};
pub use crate::config::{FrameConfig, RFC3339};
pub use crate::container::Container;
pub use crate::error::{ErrorCategory, FrameError, FrameResult};
pub use crate::group::{group_by, Group, GroupBy, GroupIndex};
pub use crate::mask::NullMask;
pub use crate::null_model::NullModel;
pub use crate::pipeline::Pipeline;
pub use crate::reduce::{
    ChronoReducer, NonNullReducer, NumericReducer, RawReducer, Reducer, TextReducer,
};
pub use crate::scalar::{zero_instant, ElementKind, OpaqueValue, Scalar, DATETIME_FORMAT};
pub use crate::sort::{sort_pass, sort_permutation, SortSpec};
pub use crate::table::Table;
pub use crate::values::Values;
pub use crate::window::{duration_windows, fixed_windows};
