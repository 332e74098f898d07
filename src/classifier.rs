//! Dimension-role inference
//!
//! Files carry no reliable schema saying which axis is time, so the role is
//! guessed from the dimension name.

use crate::errors::{NcBrowseError, Result};
use crate::metadata::Dimension;

/// True if the dimension name looks temporal (contains "time" or "date",
/// ignoring case).
pub fn is_temporal(dim_name: &str) -> bool {
    let lower = dim_name.to_lowercase();
    lower.contains("time") || lower.contains("date")
}

/// Position of the temporal axis among a variable's dimensions.
///
/// The first matching dimension wins when several names look temporal.
pub fn temporal_axis(var_name: &str, dimensions: &[Dimension]) -> Result<usize> {
    dimensions
        .iter()
        .position(|d| is_temporal(&d.name))
        .ok_or_else(|| NcBrowseError::MissingDimension {
            var: Some(var_name.to_string()),
        })
}

/// The file-level time dimension, first match wins.
pub fn find_time_dimension(dimensions: &[Dimension]) -> Result<&Dimension> {
    dimensions
        .iter()
        .find(|d| is_temporal(&d.name))
        .ok_or(NcBrowseError::MissingDimension { var: None })
}
