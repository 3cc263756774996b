//! Scalar values crossing the accessor boundary

use std::ffi::{c_char, c_int};
use std::fmt;

use crate::types::FieldType;

/// Platform `wchar_t` (32-bit on unix, 16-bit on Windows).
pub use libc::wchar_t;

/// A field value of one of the six accessible scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    /// `int`
    Int(c_int),
    /// `char`
    Char(c_char),
    /// `bool`
    Bool(bool),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `wchar_t`
    WChar(wchar_t),
}

impl ScalarValue {
    /// The field type this value belongs to.
    pub fn field_type(&self) -> FieldType {
        match self {
            ScalarValue::Int(_) => FieldType::Int,
            ScalarValue::Char(_) => FieldType::Char,
            ScalarValue::Bool(_) => FieldType::Bool,
            ScalarValue::Float(_) => FieldType::Float,
            ScalarValue::Double(_) => FieldType::Double,
            ScalarValue::WChar(_) => FieldType::WChar,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(v) => write!(f, "{}", v),
            ScalarValue::Char(v) => write!(f, "{:?}", *v as u8 as char),
            ScalarValue::Bool(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::Double(v) => write!(f, "{}", v),
            ScalarValue::WChar(v) => match char::from_u32(*v as u32) {
                Some(c) => write!(f, "{:?}", c),
                None => write!(f, "U+{:04X}", *v as u32),
            },
        }
    }
}

/// Wide character wrapper.
///
/// `wchar_t` is an alias of `i32` on unix, so it needs its own type to
/// get a [`Scalar`] impl distinct from `int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WChar(pub wchar_t);

/// Rust types that map onto exactly one accessible [`FieldType`].
pub trait Scalar: Copy {
    /// Field type this Rust type reads and writes.
    const FIELD_TYPE: FieldType;

    /// Wrap into a [`ScalarValue`].
    fn into_value(self) -> ScalarValue;

    /// Unwrap, returning `None` when the value is of another kind.
    fn from_value(value: ScalarValue) -> Option<Self>;
}

macro_rules! impl_scalar {
    ($ty:ty, $variant:ident) => {
        impl Scalar for $ty {
            const FIELD_TYPE: FieldType = FieldType::$variant;

            fn into_value(self) -> ScalarValue {
                ScalarValue::$variant(self)
            }

            fn from_value(value: ScalarValue) -> Option<Self> {
                match value {
                    ScalarValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar!(c_int, Int);
impl_scalar!(c_char, Char);
impl_scalar!(bool, Bool);
impl_scalar!(f32, Float);
impl_scalar!(f64, Double);

impl Scalar for WChar {
    const FIELD_TYPE: FieldType = FieldType::WChar;

    fn into_value(self) -> ScalarValue {
        ScalarValue::WChar(self.0)
    }

    fn from_value(value: ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::WChar(v) => Some(WChar(v)),
            _ => None,
        }
    }
}
