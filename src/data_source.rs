//! Data source abstraction over gridded file readers
//!
//! The time-series core never touches file bytes itself. It talks to a
//! [`DataSource`]: something that can enumerate variables with their raw
//! metadata, list file-level dimensions, and perform bounded reads. The
//! NetCDF backend lives in [`crate::netcdf_io`], an in-memory one in
//! [`crate::memory`].

use crate::element::{ElementArray, ElementType};
use crate::errors::Result;
use crate::metadata::Dimension;
use std::fmt;
use std::ops::Range;

/// Raw metadata value as stored in the file.
///
/// Heterogeneous attribute payloads are narrowed to this closed set so
/// that rendering them as text stays explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
    List(Vec<AttrValue>),
    /// A value of a type the reader cannot interpret, with its best-effort
    /// rendering if one exists
    Opaque(Option<String>),
}

impl AttrValue {
    /// Best-effort string rendering, `None` if the value has no textual form
    pub fn render(&self) -> Option<String> {
        match self {
            AttrValue::Integer(v) => Some(v.to_string()),
            AttrValue::Unsigned(v) => Some(v.to_string()),
            AttrValue::Float(v) => Some(v.to_string()),
            AttrValue::Text(s) => Some(s.clone()),
            AttrValue::List(items) => items
                .iter()
                .map(AttrValue::render)
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.join(", ")),
            AttrValue::Opaque(rendered) => rendered.clone(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(s) => f.write_str(&s),
            None => f.write_str("<unrepresentable>"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Integer(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Integer(value.into())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

/// A variable as the source reports it, before catalog interpretation
#[derive(Debug, Clone)]
pub struct SourceVariable {
    pub name: String,
    pub element_type: ElementType,
    pub dimensions: Vec<Dimension>,
    /// Metadata entries in source order
    pub metadata: Vec<(String, AttrValue)>,
}

/// Read-only access to a gridded data file
pub trait DataSource {
    /// All variables, in source order
    fn variables(&self) -> Result<Vec<SourceVariable>>;

    /// File-level dimensions, in source order
    fn dimensions(&self) -> Result<Vec<Dimension>>;

    /// Read the bounded region of `var_name` given by one half-open range per
    /// dimension, in the variable's declared dimension order
    fn read(&self, var_name: &str, extents: &[Range<usize>]) -> Result<ElementArray>;

    /// Release the source and any native resources it holds
    fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        drop(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(AttrValue::Integer(-9999).render().as_deref(), Some("-9999"));
        assert_eq!(AttrValue::Float(0.5).render().as_deref(), Some("0.5"));
        assert_eq!(
            AttrValue::List(vec![AttrValue::Integer(1), AttrValue::Integer(2)])
                .render()
                .as_deref(),
            Some("1, 2")
        );
        assert_eq!(AttrValue::Opaque(None).render(), None);
        assert_eq!(
            AttrValue::List(vec![AttrValue::Integer(1), AttrValue::Opaque(None)]).render(),
            None
        );
        assert_eq!(AttrValue::Opaque(None).to_string(), "<unrepresentable>");
    }
}
