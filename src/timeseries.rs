//! Time-series assembly
//!
//! Ties the pieces together: slice the variable along time, decode the time
//! coordinate into dates, zip both by index and drop missing values.

use crate::classifier;
use crate::data_source::DataSource;
use crate::element::{Element, ElementType};
use crate::errors::{NcBrowseError, Result};
use crate::metadata::{self, Variable};
use crate::slicer;
use crate::time_units::TimeUnits;
use chrono::NaiveDateTime;
use num_traits::AsPrimitive;
use serde::Serialize;

/// One observation: a date and the variable's value at that date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint<T> {
    pub date: NaiveDateTime,
    pub value: T,
}

impl<T> DataPoint<T> {
    pub fn new(date: NaiveDateTime, value: T) -> Self {
        Self { date, value }
    }
}

/// Pairs values and dates by index and drops pairs whose value equals `missing`.
///
/// Lengths should match; if they don't, the longer input is truncated.
/// Comparison with the marker is exact, no tolerance.
pub fn assemble<T: Element>(
    values: Vec<T>,
    dates: Vec<NaiveDateTime>,
    missing: Option<T>,
) -> Vec<DataPoint<T>> {
    if values.len() != dates.len() {
        log::warn!(
            "{} values but {} dates, truncating to the shorter",
            values.len(),
            dates.len()
        );
    }

    values
        .into_iter()
        .zip(dates)
        .filter(|(value, _)| missing != Some(*value))
        .map(|(value, date)| DataPoint::new(date, value))
        .collect()
}

/// Reads a 1-D time coordinate variable as `f64` offsets.
pub fn read_time_offsets<S: DataSource + ?Sized>(
    source: &S,
    coordinate: &Variable,
) -> Result<Vec<f64>> {
    if coordinate.dimensions.len() != 1 {
        return Err(NcBrowseError::not_supported(format!(
            "time variable '{}' has {} dimensions, expected 1",
            coordinate.name,
            coordinate.dimensions.len()
        )));
    }
    if !coordinate.element_type.is_numeric() {
        return Err(NcBrowseError::not_supported(format!(
            "time variable '{}' holds {} values",
            coordinate.name, coordinate.element_type
        )));
    }

    let extent = 0..coordinate.dimensions[0].size;
    source.read(&coordinate.name, &[extent])?.into_f64()
}

/// Reads the time series of `variable` as values of type `T`.
///
/// `T` must match the variable's stored element type.
pub fn read_time_series<T: Element, S: DataSource + ?Sized>(
    source: &S,
    variable: &Variable,
) -> Result<Vec<DataPoint<T>>> {
    slicer::check_rank(variable)?;
    if variable.element_type != T::ELEMENT_TYPE {
        return Err(NcBrowseError::TypeMismatch {
            var: variable.name.clone(),
            stored: variable.element_type,
            requested: T::ELEMENT_TYPE,
        });
    }

    let values = slicer::slice_along_time::<T, S>(source, variable)?;

    let dimensions = source.dimensions()?;
    let time_dim = classifier::find_time_dimension(&dimensions)?;
    let coordinate = metadata::find_variable(source, &time_dim.name)?;
    let units = TimeUnits::from_coordinate(&coordinate)?;
    let dates = units.decode(&read_time_offsets(source, &coordinate)?)?;

    let missing = variable.missing_value.as_ref().and_then(T::from_scalar);
    let series = assemble(values, dates, missing);
    log::debug!(
        "'{}': {} points along '{}' ({} since {})",
        variable.name,
        series.len(),
        time_dim.name,
        units.delta,
        units.epoch
    );
    Ok(series)
}

/// A time series whose element type is only known at runtime
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyTimeSeries {
    Byte(Vec<DataPoint<i8>>),
    UByte(Vec<DataPoint<u8>>),
    Int16(Vec<DataPoint<i16>>),
    UInt16(Vec<DataPoint<u16>>),
    Int32(Vec<DataPoint<i32>>),
    UInt32(Vec<DataPoint<u32>>),
    Int64(Vec<DataPoint<i64>>),
    UInt64(Vec<DataPoint<u64>>),
    Float32(Vec<DataPoint<f32>>),
    Float64(Vec<DataPoint<f64>>),
}

macro_rules! with_series {
    ($series:expr, $s:ident => $body:expr) => {
        match $series {
            AnyTimeSeries::Byte($s) => $body,
            AnyTimeSeries::UByte($s) => $body,
            AnyTimeSeries::Int16($s) => $body,
            AnyTimeSeries::UInt16($s) => $body,
            AnyTimeSeries::Int32($s) => $body,
            AnyTimeSeries::UInt32($s) => $body,
            AnyTimeSeries::Int64($s) => $body,
            AnyTimeSeries::UInt64($s) => $body,
            AnyTimeSeries::Float32($s) => $body,
            AnyTimeSeries::Float64($s) => $body,
        }
    };
}

impl AnyTimeSeries {
    pub fn element_type(&self) -> ElementType {
        match self {
            AnyTimeSeries::Byte(_) => ElementType::Byte,
            AnyTimeSeries::UByte(_) => ElementType::UByte,
            AnyTimeSeries::Int16(_) => ElementType::Int16,
            AnyTimeSeries::UInt16(_) => ElementType::UInt16,
            AnyTimeSeries::Int32(_) => ElementType::Int32,
            AnyTimeSeries::UInt32(_) => ElementType::UInt32,
            AnyTimeSeries::Int64(_) => ElementType::Int64,
            AnyTimeSeries::UInt64(_) => ElementType::UInt64,
            AnyTimeSeries::Float32(_) => ElementType::Float32,
            AnyTimeSeries::Float64(_) => ElementType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        with_series!(self, s => s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widened copy for consumers that plot or print doubles
    pub fn to_f64_points(&self) -> Vec<DataPoint<f64>> {
        with_series!(self, s => s
            .iter()
            .map(|p| DataPoint::new(p.date, p.value.as_()))
            .collect())
    }
}

/// Reads the time series of `variable` at its stored element type.
pub fn read_any_time_series<S: DataSource + ?Sized>(
    source: &S,
    variable: &Variable,
) -> Result<AnyTimeSeries> {
    Ok(match variable.element_type {
        ElementType::Byte => AnyTimeSeries::Byte(read_time_series(source, variable)?),
        ElementType::UByte => AnyTimeSeries::UByte(read_time_series(source, variable)?),
        ElementType::Int16 => AnyTimeSeries::Int16(read_time_series(source, variable)?),
        ElementType::UInt16 => AnyTimeSeries::UInt16(read_time_series(source, variable)?),
        ElementType::Int32 => AnyTimeSeries::Int32(read_time_series(source, variable)?),
        ElementType::UInt32 => AnyTimeSeries::UInt32(read_time_series(source, variable)?),
        ElementType::Int64 => AnyTimeSeries::Int64(read_time_series(source, variable)?),
        ElementType::UInt64 => AnyTimeSeries::UInt64(read_time_series(source, variable)?),
        ElementType::Float32 => AnyTimeSeries::Float32(read_time_series(source, variable)?),
        ElementType::Float64 => AnyTimeSeries::Float64(read_time_series(source, variable)?),
        ElementType::Char | ElementType::String => {
            return Err(NcBrowseError::not_supported(format!(
                "variable '{}' holds {} values, not numbers",
                variable.name, variable.element_type
            )))
        }
    })
}
