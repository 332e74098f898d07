//! Element types, typed arrays and numeric coercion
//!
//! NetCDF variables store one of a small closed set of atomic types. This
//! module names that set ([`ElementType`]), carries dense buffers of any of
//! them ([`ElementArray`]), single typed values ([`Scalar`]), and the
//! [`Element`] trait that binds a Rust numeric type to its tag so callers can
//! request a typed time series without runtime reflection.

use crate::errors::{NcBrowseError, Result};
use ndarray::{ArrayD, Slice};
use num_traits::{AsPrimitive, NumCast};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Element type tag of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Byte,
    UByte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Char,
    String,
}

/// Friendly names shown to users, one entry per tag
const FRIENDLY_NAMES: [(ElementType, &str); 12] = [
    (ElementType::Byte, "byte"),
    (ElementType::UByte, "ubyte"),
    (ElementType::Int16, "short"),
    (ElementType::UInt16, "ushort"),
    (ElementType::Int32, "int"),
    (ElementType::UInt32, "uint"),
    (ElementType::Int64, "long"),
    (ElementType::UInt64, "ulong"),
    (ElementType::Float32, "float"),
    (ElementType::Float64, "double"),
    (ElementType::Char, "char"),
    (ElementType::String, "string"),
];

impl ElementType {
    /// Short user-facing name (`short`, `double`, ...)
    pub fn friendly_name(self) -> &'static str {
        FRIENDLY_NAMES
            .iter()
            .find(|(tag, _)| *tag == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }

    /// Look a tag up by its friendly name
    pub fn from_friendly_name(name: &str) -> Option<ElementType> {
        FRIENDLY_NAMES
            .iter()
            .find(|(_, friendly)| friendly.eq_ignore_ascii_case(name))
            .map(|(tag, _)| *tag)
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, ElementType::Char | ElementType::String)
    }

    /// Storage size of one element. Strings count as one pointer-sized slot.
    pub fn size_bytes(self) -> usize {
        match self {
            ElementType::Byte | ElementType::UByte | ElementType::Char => 1,
            ElementType::Int16 | ElementType::UInt16 => 2,
            ElementType::Int32 | ElementType::UInt32 | ElementType::Float32 => 4,
            ElementType::Int64 | ElementType::UInt64 | ElementType::Float64 => 8,
            ElementType::String => std::mem::size_of::<usize>(),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly_name())
    }
}

/// A single value of a known element type, e.g. a missing-value marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Byte(i8),
    UByte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    /// Marker of a `char` or `string` variable
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Byte(v) => write!(f, "{}", v),
            Scalar::UByte(v) => write!(f, "{}", v),
            Scalar::Int16(v) => write!(f, "{}", v),
            Scalar::UInt16(v) => write!(f, "{}", v),
            Scalar::Int32(v) => write!(f, "{}", v),
            Scalar::UInt32(v) => write!(f, "{}", v),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::UInt64(v) => write!(f, "{}", v),
            Scalar::Float32(v) => write!(f, "{}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Dense N-dimensional buffer holding one of the supported element types
#[derive(Debug, Clone, PartialEq)]
pub enum ElementArray {
    Byte(ArrayD<i8>),
    UByte(ArrayD<u8>),
    Int16(ArrayD<i16>),
    UInt16(ArrayD<u16>),
    Int32(ArrayD<i32>),
    UInt32(ArrayD<u32>),
    Int64(ArrayD<i64>),
    UInt64(ArrayD<u64>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Char(ArrayD<u8>),
    Str(ArrayD<String>),
}

/// Apply `$body` to the inner array of every variant, rebuilding the same variant.
macro_rules! map_array {
    ($array:expr, $a:ident => $body:expr) => {
        match $array {
            ElementArray::Byte($a) => ElementArray::Byte($body),
            ElementArray::UByte($a) => ElementArray::UByte($body),
            ElementArray::Int16($a) => ElementArray::Int16($body),
            ElementArray::UInt16($a) => ElementArray::UInt16($body),
            ElementArray::Int32($a) => ElementArray::Int32($body),
            ElementArray::UInt32($a) => ElementArray::UInt32($body),
            ElementArray::Int64($a) => ElementArray::Int64($body),
            ElementArray::UInt64($a) => ElementArray::UInt64($body),
            ElementArray::Float32($a) => ElementArray::Float32($body),
            ElementArray::Float64($a) => ElementArray::Float64($body),
            ElementArray::Char($a) => ElementArray::Char($body),
            ElementArray::Str($a) => ElementArray::Str($body),
        }
    };
}

/// Evaluate `$body` against the inner array of whichever variant is present.
macro_rules! with_array {
    ($array:expr, $a:ident => $body:expr) => {
        match $array {
            ElementArray::Byte($a) => $body,
            ElementArray::UByte($a) => $body,
            ElementArray::Int16($a) => $body,
            ElementArray::UInt16($a) => $body,
            ElementArray::Int32($a) => $body,
            ElementArray::UInt32($a) => $body,
            ElementArray::Int64($a) => $body,
            ElementArray::UInt64($a) => $body,
            ElementArray::Float32($a) => $body,
            ElementArray::Float64($a) => $body,
            ElementArray::Char($a) => $body,
            ElementArray::Str($a) => $body,
        }
    };
}

impl ElementArray {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementArray::Byte(_) => ElementType::Byte,
            ElementArray::UByte(_) => ElementType::UByte,
            ElementArray::Int16(_) => ElementType::Int16,
            ElementArray::UInt16(_) => ElementType::UInt16,
            ElementArray::Int32(_) => ElementType::Int32,
            ElementArray::UInt32(_) => ElementType::UInt32,
            ElementArray::Int64(_) => ElementType::Int64,
            ElementArray::UInt64(_) => ElementType::UInt64,
            ElementArray::Float32(_) => ElementType::Float32,
            ElementArray::Float64(_) => ElementType::Float64,
            ElementArray::Char(_) => ElementType::Char,
            ElementArray::Str(_) => ElementType::String,
        }
    }

    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out the bounded region given by one half-open range per axis.
    ///
    /// Ranges must lie inside the array; anything else is an
    /// [`NcBrowseError::Internal`] because callers derive them from the
    /// declared dimension sizes.
    pub fn slice(&self, extents: &[Range<usize>]) -> Result<ElementArray> {
        let shape = self.shape();
        if extents.len() != shape.len() {
            return Err(NcBrowseError::Internal(format!(
                "{} ranges given for an array of rank {}",
                extents.len(),
                shape.len()
            )));
        }
        for (axis, (range, &len)) in extents.iter().zip(shape).enumerate() {
            if range.start > range.end || range.end > len {
                return Err(NcBrowseError::Internal(format!(
                    "range {:?} outside axis {} of length {}",
                    range, axis, len
                )));
            }
        }

        Ok(map_array!(self, a => a
            .slice_each_axis(|ax| Slice::from(extents[ax.axis.index()].clone()))
            .to_owned()))
    }

    /// Convert every element to `f64` in logical (row-major) order.
    ///
    /// Text arrays have no numeric value and are rejected.
    pub fn into_f64(self) -> Result<Vec<f64>> {
        fn widen<T: AsPrimitive<f64>>(array: ArrayD<T>) -> Vec<f64> {
            array.iter().map(|&v| v.as_()).collect()
        }

        match self {
            ElementArray::Byte(a) => Ok(widen(a)),
            ElementArray::UByte(a) => Ok(widen(a)),
            ElementArray::Int16(a) => Ok(widen(a)),
            ElementArray::UInt16(a) => Ok(widen(a)),
            ElementArray::Int32(a) => Ok(widen(a)),
            ElementArray::UInt32(a) => Ok(widen(a)),
            ElementArray::Int64(a) => Ok(widen(a)),
            ElementArray::UInt64(a) => Ok(widen(a)),
            ElementArray::Float32(a) => Ok(widen(a)),
            ElementArray::Float64(a) => Ok(a.into_iter().collect()),
            other => Err(NcBrowseError::not_supported(format!(
                "cannot convert {} values to floating point",
                other.element_type()
            ))),
        }
    }
}

/// A numeric element type that can be requested as a time series value
pub trait Element:
    Copy + PartialEq + fmt::Debug + fmt::Display + NumCast + AsPrimitive<f64> + Serialize + 'static
{
    /// Tag a variable must carry to be read as `Self`
    const ELEMENT_TYPE: ElementType;

    /// Unwrap a buffer of this type, or `None` if it holds another type
    fn from_array(array: ElementArray) -> Option<ArrayD<Self>>;

    /// Extract a same-typed value, or `None` if the scalar holds another type
    fn from_scalar(scalar: &Scalar) -> Option<Self>;

    fn into_scalar(self) -> Scalar;
}

macro_rules! impl_element {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const ELEMENT_TYPE: ElementType = ElementType::$variant;

                fn from_array(array: ElementArray) -> Option<ArrayD<Self>> {
                    match array {
                        ElementArray::$variant(a) => Some(a),
                        _ => None,
                    }
                }

                fn from_scalar(scalar: &Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                fn into_scalar(self) -> Scalar {
                    Scalar::$variant(self)
                }
            }

            impl From<ArrayD<$t>> for ElementArray {
                fn from(array: ArrayD<$t>) -> Self {
                    ElementArray::$variant(array)
                }
            }
        )*
    };
}

impl_element!(
    i8 => Byte,
    u8 => UByte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
);

impl From<ArrayD<String>> for ElementArray {
    fn from(array: ArrayD<String>) -> Self {
        ElementArray::Str(array)
    }
}

/// Cast a numeric value into a [`Scalar`] of the given element type.
///
/// Returns `None` when the value does not fit the target type or the
/// target is textual.
pub fn cast_scalar<N: NumCast + Copy>(value: N, target: ElementType) -> Option<Scalar> {
    Some(match target {
        ElementType::Byte => Scalar::Byte(NumCast::from(value)?),
        ElementType::UByte => Scalar::UByte(NumCast::from(value)?),
        ElementType::Int16 => Scalar::Int16(NumCast::from(value)?),
        ElementType::UInt16 => Scalar::UInt16(NumCast::from(value)?),
        ElementType::Int32 => Scalar::Int32(NumCast::from(value)?),
        ElementType::UInt32 => Scalar::UInt32(NumCast::from(value)?),
        ElementType::Int64 => Scalar::Int64(NumCast::from(value)?),
        ElementType::UInt64 => Scalar::UInt64(NumCast::from(value)?),
        ElementType::Float32 => Scalar::Float32(NumCast::from(value)?),
        ElementType::Float64 => Scalar::Float64(NumCast::from(value)?),
        ElementType::Char | ElementType::String => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};

    #[test]
    fn test_friendly_names() {
        assert_eq!(ElementType::Int16.friendly_name(), "short");
        assert_eq!(ElementType::UInt64.to_string(), "ulong");
        assert_eq!(ElementType::from_friendly_name("Double"), Some(ElementType::Float64));
        assert_eq!(ElementType::from_friendly_name("complex"), None);
        assert!(!ElementType::Char.is_numeric());
        assert!(ElementType::Byte.is_numeric());
    }

    #[test]
    fn test_into_f64_widens_every_numeric_type() -> Result<()> {
        let ints = ElementArray::from(array![-3i16, 0, 7].into_dyn());
        assert_eq!(ints.into_f64()?, vec![-3.0, 0.0, 7.0]);

        let big = ElementArray::from(array![u64::MAX].into_dyn());
        assert_eq!(big.into_f64()?, vec![u64::MAX as f64]);

        let floats = ElementArray::from(array![1.5f32, 2.25].into_dyn());
        assert_eq!(floats.into_f64()?, vec![1.5, 2.25]);
        Ok(())
    }

    #[test]
    fn test_into_f64_rejects_text() {
        let text = ElementArray::Char(array![b'a', b'b'].into_dyn());
        match text.into_f64() {
            Err(NcBrowseError::NotSupported { message }) => assert!(message.contains("char")),
            other => panic!("Expected NotSupported, got {:?}", other),
        }
    }

    #[test]
    fn test_slice_bounds() -> Result<()> {
        let data = ArrayD::from_shape_vec(IxDyn(&[2, 3]), (0..6).collect::<Vec<i32>>())?;
        let array = ElementArray::from(data);

        let column = array.slice(&[0..2, 1..2])?;
        assert_eq!(column.shape(), &[2, 1]);
        assert_eq!(column.into_f64()?, vec![1.0, 4.0]);

        assert!(matches!(
            array.slice(&[0..3, 0..1]),
            Err(NcBrowseError::Internal(_))
        ));
        assert!(matches!(array.slice(&[0..1]), Err(NcBrowseError::Internal(_))));
        Ok(())
    }

    #[test]
    fn test_element_unwraps_only_its_own_type() {
        let array = ElementArray::from(array![1.0f64].into_dyn());
        assert!(f32::from_array(array.clone()).is_none());
        assert!(f64::from_array(array).is_some());

        assert_eq!(i32::from_scalar(&Scalar::Int32(-9999)), Some(-9999));
        assert_eq!(i32::from_scalar(&Scalar::Int64(-9999)), None);
    }

    #[test]
    fn test_cast_scalar() {
        assert_eq!(cast_scalar(-9999i64, ElementType::Float32), Some(Scalar::Float32(-9999.0)));
        assert_eq!(cast_scalar(-1i64, ElementType::UInt16), None);
        assert_eq!(cast_scalar(1e40f64, ElementType::Int32), None);
        assert_eq!(cast_scalar(3i64, ElementType::String), None);
    }
}
