//! ncbrowse: time series out of NetCDF variables
//!
//! Given an N-dimensional variable in a NetCDF file, ncbrowse finds the time
//! axis, pins every other axis to its first index, decodes the time
//! coordinate through its CF `units` attribute (`"days since 2000-01-01"`)
//! and drops points flagged by the variable's missing-value marker. The
//! result is an ordered `Vec<DataPoint<T>>` for any numeric element type.
//!
//! ## Module Organization
//!
//! - [`metadata`]: variable and dimension catalog
//! - [`classifier`]: which dimension is time
//! - [`time_units`]: `<unit> since <epoch>` parsing and date decoding
//! - [`slicer`]: bounded reads along the time axis
//! - [`element`]: element types, typed arrays and numeric coercion
//! - [`timeseries`]: assembly of the final series
//! - [`data_source`], [`netcdf_io`], [`memory`]: file access backends
//! - [`dataset`]: open/read/close sessions
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ncbrowse::prelude::*;
//!
//! let dataset = Dataset::open("sst.nc")?;
//! for variable in dataset.list_variables()? {
//!     println!("{} ({})", variable.name, variable.element_type);
//! }
//!
//! let sst = dataset.variable("sst")?;
//! let series = dataset.read_time_series::<f32>(&sst)?;
//! for point in &series {
//!     println!("{} {}", point.date, point.value);
//! }
//! dataset.close()?;
//! # Ok::<(), ncbrowse::NcBrowseError>(())
//! ```

pub mod classifier;
pub mod data_source;
pub mod dataset;
pub mod element;
pub mod errors;
pub mod memory;
pub mod metadata;
pub mod netcdf_io;
pub mod slicer;
pub mod time_units;
pub mod timeseries;

pub use data_source::{AttrValue, DataSource, SourceVariable};
pub use dataset::Dataset;
pub use element::{Element, ElementArray, ElementType, Scalar};
pub use errors::{IoFailure, NcBrowseError, Result};
pub use memory::MemorySource;
pub use metadata::{list_variables, Attribute, Dimension, Variable};
pub use netcdf_io::NetCDFSource;
pub use time_units::{Delta, TimeUnits};
pub use timeseries::{read_any_time_series, read_time_series, AnyTimeSeries, DataPoint};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::data_source::DataSource;
    pub use crate::dataset::Dataset;
    pub use crate::element::{Element, ElementType};
    pub use crate::errors::{NcBrowseError, Result};
    pub use crate::memory::MemorySource;
    pub use crate::metadata::{Attribute, Dimension, Variable};
    pub use crate::netcdf_io::NetCDFSource;
    pub use crate::timeseries::{AnyTimeSeries, DataPoint};
}
