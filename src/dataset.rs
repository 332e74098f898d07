//! File sessions
//!
//! A [`Dataset`] owns an open [`DataSource`] for as many catalog and
//! time-series calls as the caller needs, and releases it on [`Dataset::close`]
//! (or on drop).

use crate::data_source::DataSource;
use crate::element::Element;
use crate::errors::Result;
use crate::metadata::{self, Dimension, Variable};
use crate::netcdf_io::NetCDFSource;
use crate::timeseries::{self, AnyTimeSeries, DataPoint};
use std::path::Path;

/// An open data file
pub struct Dataset<S: DataSource = NetCDFSource> {
    source: S,
}

impl Dataset<NetCDFSource> {
    /// Open a NetCDF file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            source: NetCDFSource::open(path)?,
        })
    }
}

impl<S: DataSource> Dataset<S> {
    pub fn from_source(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// All variables, in source order
    pub fn list_variables(&self) -> Result<Vec<Variable>> {
        metadata::list_variables(&self.source)
    }

    /// File-level dimensions, in source order
    pub fn dimensions(&self) -> Result<Vec<Dimension>> {
        self.source.dimensions()
    }

    pub fn variable(&self, name: &str) -> Result<Variable> {
        metadata::find_variable(&self.source, name)
    }

    /// Time series of `variable` with values of its stored type `T`
    pub fn read_time_series<T: Element>(&self, variable: &Variable) -> Result<Vec<DataPoint<T>>> {
        timeseries::read_time_series(&self.source, variable)
    }

    /// Time series of `variable` at whatever type it stores
    pub fn read_any_time_series(&self, variable: &Variable) -> Result<AnyTimeSeries> {
        timeseries::read_any_time_series(&self.source, variable)
    }

    /// Release the file and its native resources
    pub fn close(self) -> Result<()> {
        self.source.close()
    }
}
