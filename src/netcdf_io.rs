//! NetCDF file access
//!
//! [`NetCDFSource`] implements [`DataSource`] on top of the `netcdf` crate:
//! opening with not-found / unreadable / corrupt distinguished, variable and
//! attribute enumeration, and bounded reads into typed arrays.

use crate::data_source::{AttrValue, DataSource, SourceVariable};
use crate::element::{ElementArray, ElementType};
use crate::errors::{IoFailure, NcBrowseError, Result};
use crate::metadata::Dimension;
use ndarray::{ArrayD, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::{AttributeValue, File};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// An open, read-only NetCDF file
pub struct NetCDFSource {
    file: File,
    path: PathBuf,
}

impl NetCDFSource {
    /// Open a NetCDF file for reading
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(NcBrowseError::Io {
                path: path.to_path_buf(),
                failure: IoFailure::NotFound,
            });
        }
        if path.is_dir() {
            return Err(NcBrowseError::Io {
                path: path.to_path_buf(),
                failure: IoFailure::Unreadable(std::io::Error::other("is a directory")),
            });
        }
        if let Err(e) = std::fs::File::open(path) {
            return Err(NcBrowseError::Io {
                path: path.to_path_buf(),
                failure: IoFailure::Unreadable(e),
            });
        }

        let file = netcdf::open(path).map_err(|e| NcBrowseError::Format {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::info!("Opened NetCDF file: {}", path.display());

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for NetCDFSource {
    fn variables(&self) -> Result<Vec<SourceVariable>> {
        let mut variables = Vec::new();
        for var in self.file.variables() {
            let element_type = match element_type_of(&var) {
                Some(t) => t,
                None => {
                    log::warn!(
                        "Skipping variable '{}' of unsupported type {:?}",
                        var.name(),
                        var.vartype()
                    );
                    continue;
                }
            };

            let dimensions = var
                .dimensions()
                .iter()
                .map(|d| Dimension::new(d.name(), d.len(), d.is_unlimited()))
                .collect();

            let metadata = var
                .attributes()
                .map(|attr| {
                    let value = match attr.value() {
                        Ok(value) => convert_attribute(value),
                        Err(e) => {
                            log::debug!(
                                "Cannot read attribute '{}' of '{}': {}",
                                attr.name(),
                                var.name(),
                                e
                            );
                            AttrValue::Opaque(None)
                        }
                    };
                    (attr.name().to_string(), value)
                })
                .collect();

            variables.push(SourceVariable {
                name: var.name(),
                element_type,
                dimensions,
                metadata,
            });
        }
        Ok(variables)
    }

    fn dimensions(&self) -> Result<Vec<Dimension>> {
        Ok(self
            .file
            .dimensions()
            .map(|d| Dimension::new(d.name(), d.len(), d.is_unlimited()))
            .collect())
    }

    fn read(&self, var_name: &str, extents: &[Range<usize>]) -> Result<ElementArray> {
        let var = self
            .file
            .variable(var_name)
            .ok_or_else(|| NcBrowseError::VariableNotFound {
                var: var_name.to_string(),
            })?;

        let dims = var.dimensions();
        if dims.len() != extents.len() {
            return Err(NcBrowseError::Internal(format!(
                "{} ranges given for '{}' with {} dimensions",
                extents.len(),
                var_name,
                dims.len()
            )));
        }
        for (dim, range) in dims.iter().zip(extents) {
            if range.start > range.end || range.end > dim.len() {
                return Err(NcBrowseError::Internal(format!(
                    "range {:?} outside dimension '{}' of '{}' (size {})",
                    range,
                    dim.name(),
                    var_name,
                    dim.len()
                )));
            }
        }

        let shape: Vec<usize> = extents.iter().map(|r| r.end - r.start).collect();
        let empty = shape.iter().product::<usize>() == 0;

        // Fetch the bounded region as `$t`, keeping the variable's dimension order
        macro_rules! read_as {
            ($t:ty, $variant:ident) => {{
                let values: Vec<$t> = if empty {
                    Vec::new()
                } else {
                    match extents {
                        [] => var.get_values::<$t, _>(..)?,
                        [a] => var.get_values::<$t, _>(a.clone())?,
                        [a, b] => var.get_values::<$t, _>((a.clone(), b.clone()))?,
                        [a, b, c] => {
                            var.get_values::<$t, _>((a.clone(), b.clone(), c.clone()))?
                        }
                        _ => {
                            return Err(NcBrowseError::not_supported(format!(
                                "bounded read of '{}' with {} dimensions (max 3)",
                                var_name,
                                extents.len()
                            )))
                        }
                    }
                };
                ElementArray::$variant(ArrayD::from_shape_vec(IxDyn(&shape), values)?)
            }};
        }

        let element_type = element_type_of(&var);
        Ok(match element_type {
            Some(ElementType::Byte) => read_as!(i8, Byte),
            Some(ElementType::UByte) => read_as!(u8, UByte),
            Some(ElementType::Int16) => read_as!(i16, Int16),
            Some(ElementType::UInt16) => read_as!(u16, UInt16),
            Some(ElementType::Int32) => read_as!(i32, Int32),
            Some(ElementType::UInt32) => read_as!(u32, UInt32),
            Some(ElementType::Int64) => read_as!(i64, Int64),
            Some(ElementType::UInt64) => read_as!(u64, UInt64),
            Some(ElementType::Float32) => read_as!(f32, Float32),
            Some(ElementType::Float64) => read_as!(f64, Float64),
            Some(other @ (ElementType::Char | ElementType::String)) => {
                return Err(NcBrowseError::not_supported(format!(
                    "bounded read of {} variable '{}'",
                    other, var_name
                )))
            }
            None => {
                return Err(NcBrowseError::not_supported(format!(
                    "variable '{}' has unsupported type {:?}",
                    var_name,
                    var.vartype()
                )))
            }
        })
    }

    fn close(self) -> Result<()> {
        log::info!("Closing NetCDF file: {}", self.path.display());
        // dropping the handle closes the underlying ncid
        drop(self.file);
        Ok(())
    }
}

fn element_type_of(var: &netcdf::Variable) -> Option<ElementType> {
    match var.vartype() {
        NcVariableType::Int(IntType::I8) => Some(ElementType::Byte),
        NcVariableType::Int(IntType::U8) => Some(ElementType::UByte),
        NcVariableType::Int(IntType::I16) => Some(ElementType::Int16),
        NcVariableType::Int(IntType::U16) => Some(ElementType::UInt16),
        NcVariableType::Int(IntType::I32) => Some(ElementType::Int32),
        NcVariableType::Int(IntType::U32) => Some(ElementType::UInt32),
        NcVariableType::Int(IntType::I64) => Some(ElementType::Int64),
        NcVariableType::Int(IntType::U64) => Some(ElementType::UInt64),
        NcVariableType::Float(FloatType::F32) => Some(ElementType::Float32),
        NcVariableType::Float(FloatType::F64) => Some(ElementType::Float64),
        NcVariableType::Char => Some(ElementType::Char),
        NcVariableType::String => Some(ElementType::String),
        _ => None,
    }
}

fn convert_attribute(value: AttributeValue) -> AttrValue {
    fn list<T>(values: Vec<T>, f: impl Fn(T) -> AttrValue) -> AttrValue {
        AttrValue::List(values.into_iter().map(f).collect())
    }

    match value {
        AttributeValue::Str(s) => AttrValue::Text(s),
        AttributeValue::Strs(ss) => list(ss, AttrValue::Text),
        AttributeValue::Schar(v) => AttrValue::Integer(v.into()),
        AttributeValue::Uchar(v) => AttrValue::Unsigned(v.into()),
        AttributeValue::Short(v) => AttrValue::Integer(v.into()),
        AttributeValue::Ushort(v) => AttrValue::Unsigned(v.into()),
        AttributeValue::Int(v) => AttrValue::Integer(v.into()),
        AttributeValue::Uint(v) => AttrValue::Unsigned(v.into()),
        AttributeValue::Longlong(v) => AttrValue::Integer(v),
        AttributeValue::Ulonglong(v) => AttrValue::Unsigned(v),
        AttributeValue::Float(v) => AttrValue::Float(v.into()),
        AttributeValue::Double(v) => AttrValue::Float(v),
        AttributeValue::Schars(vs) => list(vs, |v| AttrValue::Integer(v.into())),
        AttributeValue::Uchars(vs) => list(vs, |v| AttrValue::Unsigned(v.into())),
        AttributeValue::Shorts(vs) => list(vs, |v| AttrValue::Integer(v.into())),
        AttributeValue::Ushorts(vs) => list(vs, |v| AttrValue::Unsigned(v.into())),
        AttributeValue::Ints(vs) => list(vs, |v| AttrValue::Integer(v.into())),
        AttributeValue::Uints(vs) => list(vs, |v| AttrValue::Unsigned(v.into())),
        AttributeValue::Longlongs(vs) => list(vs, AttrValue::Integer),
        AttributeValue::Ulonglongs(vs) => list(vs, AttrValue::Unsigned),
        AttributeValue::Floats(vs) => list(vs, |v| AttrValue::Float(v.into())),
        AttributeValue::Doubles(vs) => list(vs, AttrValue::Float),
        #[allow(unreachable_patterns)]
        other => AttrValue::Opaque(Some(format!("{:?}", other))),
    }
}
