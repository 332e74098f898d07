//! Time-axis slicing of variables with up to three dimensions
//!
//! Reads the full extent of the temporal dimension while every other
//! dimension is pinned to index 0, then flattens the result along the
//! temporal axis wherever it sits in the variable's dimension order.

use crate::classifier;
use crate::data_source::DataSource;
use crate::element::Element;
use crate::errors::{NcBrowseError, Result};
use crate::metadata::Variable;
use ndarray::{ArrayD, Axis};
use std::ops::Range;

/// Highest variable rank the slicer handles
pub const MAX_RANK: usize = 3;

/// Bounded read plan for one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlice {
    /// Position of the temporal dimension in the variable's dimension order
    pub axis: usize,
    /// One half-open range per dimension
    pub extents: Vec<Range<usize>>,
}

impl TimeSlice {
    /// Plans the read: full temporal extent, index 0 everywhere else.
    ///
    /// Returns `Ok(None)` when some dimension is empty, since there is then
    /// nothing to read.
    pub fn plan(variable: &Variable) -> Result<Option<Self>> {
        check_rank(variable)?;
        let axis = classifier::temporal_axis(&variable.name, &variable.dimensions)?;

        if variable.dimensions.iter().any(|d| d.size == 0) {
            return Ok(None);
        }

        let extents = variable
            .dimensions
            .iter()
            .enumerate()
            .map(|(i, d)| if i == axis { 0..d.size } else { 0..1 })
            .collect();

        Ok(Some(Self { axis, extents }))
    }

    fn expected_shape(&self) -> Vec<usize> {
        self.extents.iter().map(|r| r.end - r.start).collect()
    }
}

/// Rejects variables with more than [`MAX_RANK`] dimensions.
pub fn check_rank(variable: &Variable) -> Result<()> {
    if variable.dimensions.len() > MAX_RANK {
        return Err(NcBrowseError::not_supported(format!(
            "variable '{}' has {} dimensions (max {})",
            variable.name,
            variable.dimensions.len(),
            MAX_RANK
        )));
    }
    Ok(())
}

/// Reads the values of `variable` along its temporal dimension, in index order.
pub fn slice_along_time<T: Element, S: DataSource + ?Sized>(
    source: &S,
    variable: &Variable,
) -> Result<Vec<T>> {
    let plan = match TimeSlice::plan(variable)? {
        Some(plan) => plan,
        None => {
            log::debug!("'{}' has an empty dimension, nothing to read", variable.name);
            return Ok(Vec::new());
        }
    };

    log::debug!(
        "Reading '{}' with extents {:?} (time axis {})",
        variable.name,
        plan.extents,
        plan.axis
    );
    let raw = source.read(&variable.name, &plan.extents)?;

    if raw.shape() != plan.expected_shape().as_slice() {
        return Err(NcBrowseError::Internal(format!(
            "read of '{}' returned shape {:?}, expected {:?}",
            variable.name,
            raw.shape(),
            plan.expected_shape()
        )));
    }

    let found = raw.element_type();
    let array = T::from_array(raw).ok_or_else(|| {
        NcBrowseError::Internal(format!(
            "read of '{}' returned {} values, expected {}",
            variable.name,
            found,
            T::ELEMENT_TYPE
        ))
    })?;

    Ok(flatten_along(&array, plan.axis))
}

/// Values of the single lane along `axis`; every other axis has length 1.
fn flatten_along<T: Clone>(array: &ArrayD<T>, axis: usize) -> Vec<T> {
    array
        .lanes(Axis(axis))
        .into_iter()
        .next()
        .map(|lane| lane.to_vec())
        .unwrap_or_default()
}
