//! Variable and dimension catalog
//!
//! Turns the raw variable listing of a [`DataSource`] into fully populated
//! [`Variable`]s: dimensions with their temporal role, attributes rendered as
//! text, the CF long name and the missing-value marker.

use crate::classifier;
use crate::data_source::{AttrValue, DataSource, SourceVariable};
use crate::element::{cast_scalar, ElementType, Scalar};
use crate::errors::{NcBrowseError, Result};
use serde::Serialize;

/// The long name attribute as specified by the CF convention.
const ATTR_LONG_NAME: &str = "long_name";

/// Canonical missing-value key (NetCDF `_FillValue`).
const ATTR_FILL_VALUE: &str = "_FillValue";

/// Fallback missing-value keys, tried in order, ignoring case.
const MISSING_VALUE_ALIASES: [&str; 3] = ["missingvalue", "missing_value", "_missingvalue"];

/// Information about a dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
    pub size: usize,
    pub is_unlimited: bool,
    pub is_temporal: bool,
}

impl Dimension {
    pub fn new(name: impl Into<String>, size: usize, is_unlimited: bool) -> Self {
        let name = name.into();
        let is_temporal = classifier::is_temporal(&name);
        Self {
            name,
            size,
            is_unlimited,
            is_temporal,
        }
    }
}

/// A metadata entry, value rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A variable in a data file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub element_type: ElementType,
    pub dimensions: Vec<Dimension>,
    /// Long name of the variable, or `None` if it doesn't have one
    pub long_name: Option<String>,
    pub attributes: Vec<Attribute>,
    /// Missing-value marker, already cast to `element_type`
    pub missing_value: Option<Scalar>,
}

impl Variable {
    /// Interpret the metadata of a raw source variable.
    pub fn from_source(raw: SourceVariable) -> Self {
        let long_name = raw
            .metadata
            .iter()
            .find(|(key, _)| key == ATTR_LONG_NAME)
            .and_then(|(_, value)| value.as_text())
            .map(str::to_string);

        let missing_value = missing_value_marker(&raw.name, raw.element_type, &raw.metadata);

        let mut attributes = Vec::with_capacity(raw.metadata.len());
        for (key, value) in &raw.metadata {
            match value.render() {
                Some(rendered) => attributes.push(Attribute {
                    name: key.clone(),
                    value: rendered,
                }),
                None => log::debug!(
                    "Skipping attribute '{}' of '{}': no string representation",
                    key,
                    raw.name
                ),
            }
        }

        Self {
            name: raw.name,
            element_type: raw.element_type,
            dimensions: raw.dimensions,
            long_name,
            attributes,
            missing_value,
        }
    }

    /// Value of the named attribute, exact name match
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn shape(&self) -> Vec<usize> {
        self.dimensions.iter().map(|d| d.size).collect()
    }

    pub fn total_elements(&self) -> usize {
        self.dimensions.iter().map(|d| d.size).product()
    }

    pub fn estimated_size_bytes(&self) -> usize {
        self.total_elements() * self.element_type.size_bytes()
    }
}

/// Lists every variable of the source, in source order.
pub fn list_variables<S: DataSource + ?Sized>(source: &S) -> Result<Vec<Variable>> {
    let variables: Vec<Variable> = source
        .variables()?
        .into_iter()
        .map(Variable::from_source)
        .collect();
    log::debug!("Catalogued {} variables", variables.len());
    Ok(variables)
}

/// Looks a single variable up by name.
pub fn find_variable<S: DataSource + ?Sized>(source: &S, var_name: &str) -> Result<Variable> {
    source
        .variables()?
        .into_iter()
        .find(|v| v.name == var_name)
        .map(Variable::from_source)
        .ok_or_else(|| NcBrowseError::VariableNotFound {
            var: var_name.to_string(),
        })
}

/// `_FillValue` first, then the aliases in order. A key that is present but
/// cannot be cast to the variable's type counts as absent.
fn missing_value_marker(
    var_name: &str,
    element_type: ElementType,
    metadata: &[(String, AttrValue)],
) -> Option<Scalar> {
    let canonical = metadata
        .iter()
        .find(|(key, _)| key == ATTR_FILL_VALUE)
        .and_then(|(key, value)| marker_from(var_name, key, value, element_type));

    canonical.or_else(|| {
        MISSING_VALUE_ALIASES.iter().find_map(|alias| {
            metadata
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(alias))
                .and_then(|(key, value)| marker_from(var_name, key, value, element_type))
        })
    })
}

fn marker_from(
    var_name: &str,
    key: &str,
    value: &AttrValue,
    element_type: ElementType,
) -> Option<Scalar> {
    let marker = match value {
        AttrValue::Integer(v) => cast_scalar(*v, element_type),
        AttrValue::Unsigned(v) => cast_scalar(*v, element_type),
        AttrValue::Float(v) => cast_scalar(*v, element_type),
        AttrValue::Text(s) if !element_type.is_numeric() => Some(Scalar::Text(s.clone())),
        // CF allows a vector of missing values; only the first is honoured
        AttrValue::List(items) => items
            .first()
            .and_then(|first| marker_from(var_name, key, first, element_type)),
        _ => None,
    };
    if marker.is_none() {
        log::warn!(
            "Ignoring '{}' on '{}': {} is not a valid {} value",
            key,
            var_name,
            value,
            element_type
        );
    }
    marker
}
