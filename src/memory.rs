//! In-memory data source
//!
//! Holds dimensions, variables and attributes in plain Rust values. Useful
//! for synthetic datasets and for types classic NetCDF files cannot store.

use crate::data_source::{AttrValue, DataSource, SourceVariable};
use crate::element::ElementArray;
use crate::errors::{NcBrowseError, Result};
use crate::metadata::Dimension;
use std::ops::Range;

#[derive(Debug, Clone)]
struct StoredVariable {
    meta: SourceVariable,
    data: ElementArray,
}

/// A dataset kept entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    dimensions: Vec<Dimension>,
    variables: Vec<StoredVariable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dimension(&mut self, name: &str, size: usize) -> Result<&mut Self> {
        self.push_dimension(name, size, false)
    }

    pub fn add_unlimited_dimension(&mut self, name: &str, size: usize) -> Result<&mut Self> {
        self.push_dimension(name, size, true)
    }

    fn push_dimension(&mut self, name: &str, size: usize, unlimited: bool) -> Result<&mut Self> {
        if self.dimensions.iter().any(|d| d.name == name) {
            return Err(NcBrowseError::Format {
                path: "<memory>".into(),
                message: format!("dimension '{}' defined twice", name),
            });
        }
        self.dimensions.push(Dimension::new(name, size, unlimited));
        Ok(self)
    }

    /// Adds a variable over previously added dimensions. The data shape must
    /// match the dimension sizes.
    pub fn add_variable(
        &mut self,
        name: &str,
        dims: &[&str],
        data: impl Into<ElementArray>,
    ) -> Result<&mut Self> {
        let data = data.into();
        if self.variables.iter().any(|v| v.meta.name == name) {
            return Err(NcBrowseError::Format {
                path: "<memory>".into(),
                message: format!("variable '{}' defined twice", name),
            });
        }

        let dimensions = dims
            .iter()
            .map(|dim_name| {
                self.dimensions
                    .iter()
                    .find(|d| d.name == *dim_name)
                    .cloned()
                    .ok_or_else(|| NcBrowseError::Format {
                        path: "<memory>".into(),
                        message: format!("variable '{}' uses unknown dimension '{}'", name, dim_name),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let declared: Vec<usize> = dimensions.iter().map(|d| d.size).collect();
        if data.shape() != declared.as_slice() {
            return Err(NcBrowseError::Format {
                path: "<memory>".into(),
                message: format!(
                    "data of '{}' has shape {:?}, dimensions declare {:?}",
                    name,
                    data.shape(),
                    declared
                ),
            });
        }

        self.variables.push(StoredVariable {
            meta: SourceVariable {
                name: name.to_string(),
                element_type: data.element_type(),
                dimensions,
                metadata: Vec::new(),
            },
            data,
        });
        Ok(self)
    }

    /// Sets an attribute on a variable, replacing any previous value under the same name.
    pub fn put_attribute(
        &mut self,
        var_name: &str,
        name: &str,
        value: impl Into<AttrValue>,
    ) -> Result<&mut Self> {
        let stored = self
            .variables
            .iter_mut()
            .find(|v| v.meta.name == var_name)
            .ok_or_else(|| NcBrowseError::VariableNotFound {
                var: var_name.to_string(),
            })?;

        let value = value.into();
        match stored.meta.metadata.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => stored.meta.metadata.push((name.to_string(), value)),
        }
        Ok(self)
    }
}

impl DataSource for MemorySource {
    fn variables(&self) -> Result<Vec<SourceVariable>> {
        Ok(self.variables.iter().map(|v| v.meta.clone()).collect())
    }

    fn dimensions(&self) -> Result<Vec<Dimension>> {
        Ok(self.dimensions.clone())
    }

    fn read(&self, var_name: &str, extents: &[Range<usize>]) -> Result<ElementArray> {
        let stored = self
            .variables
            .iter()
            .find(|v| v.meta.name == var_name)
            .ok_or_else(|| NcBrowseError::VariableNotFound {
                var: var_name.to_string(),
            })?;
        stored.data.slice(extents)
    }
}
