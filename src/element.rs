//! Numeric element types that can be written to and read from a stream.

use std::fmt::{self, Display};
use std::str::FromStr;

use hdf5::types::{FloatSize, IntSize, TypeDescriptor};
use hdf5::H5Type;
use ndarray::Array1;

use crate::error::{Error, Result};

/// A number that can be stored as the `data` of an array.
pub trait Element: H5Type + Copy + Display + PartialEq + 'static {
    const KIND: ElementKind;

    /// C name of the type, as printed in array dumps.
    fn type_name() -> &'static str {
        Self::KIND.type_name()
    }

    /// Converts a global element index into a value, wrapping like a numeric cast.
    fn from_index(index: usize) -> Self;

    /// Formats a value for an array dump.
    ///
    /// Integers are printed in full; floats use six significant digits and switch to
    /// exponent notation for large and small magnitudes (`1e+06`), like C's `%g`.
    fn format_value(self) -> String;
}

/// Runtime tag for the supported element types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl Default for ElementKind {
    fn default() -> Self {
        Self::F64
    }
}

macro_rules! impl_element {
    ($($ty:ty => $kind:ident, $c_name:expr, $rust_name:expr, $format:ident;)+) => {
        $(
            impl Element for $ty {
                const KIND: ElementKind = ElementKind::$kind;

                fn from_index(index: usize) -> Self {
                    index as $ty
                }

                fn format_value(self) -> String {
                    $format(self)
                }
            }
        )+

        impl ElementKind {
            pub const ALL: &'static [ElementKind] = &[$(ElementKind::$kind),+];

            pub fn type_name(self) -> &'static str {
                match self {
                    $(ElementKind::$kind => $c_name,)+
                }
            }

            pub fn rust_name(self) -> &'static str {
                match self {
                    $(ElementKind::$kind => $rust_name,)+
                }
            }

            pub fn size(self) -> usize {
                match self {
                    $(ElementKind::$kind => std::mem::size_of::<$ty>(),)+
                }
            }
        }
    };
}

impl_element! {
    i8 => I8, "char", "i8", format_integer;
    u8 => U8, "unsigned char", "u8", format_integer;
    i16 => I16, "short", "i16", format_integer;
    u16 => U16, "unsigned short", "u16", format_integer;
    i32 => I32, "int", "i32", format_integer;
    u32 => U32, "unsigned int", "u32", format_integer;
    i64 => I64, "long", "i64", format_integer;
    u64 => U64, "unsigned long", "u64", format_integer;
    f32 => F32, "float", "f32", format_float;
    f64 => F64, "double", "f64", format_float;
}

/// Significant digits of a formatted float.
const FLOAT_PRECISION: i32 = 6;

fn format_integer<T: Display>(value: T) -> String {
    value.to_string()
}

fn format_float<T: Into<f64>>(value: T) -> String {
    let value = value.into();
    if value == 0. {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value < 0. { "-inf" } else { "inf" }.to_owned();
    }

    // rounding to the target precision may bump the exponent (999999.7 -> 1e+06)
    let sci = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if exp < -4 || exp >= FLOAT_PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let fixed = format!("{:.*}", (FLOAT_PRECISION - 1 - exp) as usize, value);
        trim_fraction(&fixed).to_owned()
    }
}

/// Drops trailing zeros of the fractional part, and the point if nothing is left.
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

impl ElementKind {
    /// Recovers the element kind from the datatype of a stored dataset.
    pub fn from_descriptor(desc: &TypeDescriptor) -> Option<Self> {
        Some(match *desc {
            TypeDescriptor::Integer(IntSize::U1) => Self::I8,
            TypeDescriptor::Unsigned(IntSize::U1) => Self::U8,
            TypeDescriptor::Integer(IntSize::U2) => Self::I16,
            TypeDescriptor::Unsigned(IntSize::U2) => Self::U16,
            TypeDescriptor::Integer(IntSize::U4) => Self::I32,
            TypeDescriptor::Unsigned(IntSize::U4) => Self::U32,
            TypeDescriptor::Integer(IntSize::U8) => Self::I64,
            TypeDescriptor::Unsigned(IntSize::U8) => Self::U64,
            TypeDescriptor::Float(FloatSize::U4) => Self::F32,
            TypeDescriptor::Float(FloatSize::U8) => Self::F64,
            _ => return None,
        })
    }
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.type_name() == s || kind.rust_name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|kind| kind.type_name()).collect();
                format!("unknown element type {:?} (expected one of: {})", s, names.join(", "))
                    .into()
            })
    }
}

/// Values written by `rank` into each of its arrays: `rank * n_elem + i` for `i < n_elem`.
pub fn initialize_array<T: Element>(rank: usize, n_elem: usize) -> Array1<T> {
    let offset = rank * n_elem;
    Array1::from_shape_fn(n_elem, |i| T::from_index(offset + i))
}

#[cfg(test)]
pub mod tests {
    use hdf5::types::{FloatSize, IntSize, TypeDescriptor};
    use hdf5::H5Type;
    use ndarray::arr1;

    use super::{format_float, initialize_array, Element, ElementKind};

    #[test]
    pub fn test_type_names() {
        assert_eq!(f64::type_name(), "double");
        assert_eq!(u32::type_name(), "unsigned int");
        assert_eq!(ElementKind::default(), ElementKind::F64);
        assert_eq!(ElementKind::I16.to_string(), "short");
        assert_eq!(ElementKind::U64.size(), 8);
    }

    #[test]
    pub fn test_parse() {
        assert_eq!("double".parse::<ElementKind>().unwrap(), ElementKind::F64);
        assert_eq!("f32".parse::<ElementKind>().unwrap(), ElementKind::F32);
        assert_eq!(" unsigned char ".parse::<ElementKind>().unwrap(), ElementKind::U8);
        assert_err!("quad".parse::<ElementKind>(), "unknown element type \"quad\"");
        for kind in ElementKind::ALL {
            assert_eq!(kind.type_name().parse::<ElementKind>().unwrap(), *kind);
        }
    }

    #[test]
    pub fn test_from_descriptor() {
        assert_eq!(
            ElementKind::from_descriptor(&TypeDescriptor::Float(FloatSize::U8)),
            Some(ElementKind::F64)
        );
        assert_eq!(
            ElementKind::from_descriptor(&TypeDescriptor::Unsigned(IntSize::U2)),
            Some(ElementKind::U16)
        );
        assert_eq!(ElementKind::from_descriptor(&TypeDescriptor::Boolean), None);
        assert_eq!(ElementKind::from_descriptor(&f32::type_descriptor()), Some(ElementKind::F32));
        assert_eq!(ElementKind::from_descriptor(&i64::type_descriptor()), Some(ElementKind::I64));
    }

    #[test]
    pub fn test_format_value() {
        assert_eq!(1_000_000i64.format_value(), "1000000");
        assert_eq!((-7i8).format_value(), "-7");
        assert_eq!(1_000_000f64.format_value(), "1e+06");
        assert_eq!(1_234_567f64.format_value(), "1.23457e+06");
        assert_eq!(999_999.7f64.format_value(), "1e+06");
        assert_eq!(123_456f64.format_value(), "123456");
        assert_eq!(0.5f32.format_value(), "0.5");
        assert_eq!(2f64.format_value(), "2");
        assert_eq!(0.0001f64.format_value(), "0.0001");
        assert_eq!(0.00001f64.format_value(), "1e-05");
        assert_eq!((-2.5e-7f64).format_value(), "-2.5e-07");
        assert_eq!(1e100f64.format_value(), "1e+100");
        assert_eq!(format_float(0f64), "0");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }

    #[test]
    pub fn test_initialize_array() {
        assert_eq!(initialize_array::<f64>(0, 3), arr1(&[0., 1., 2.]));
        assert_eq!(initialize_array::<i32>(2, 4), arr1(&[8, 9, 10, 11]));
        assert_eq!(initialize_array::<u8>(1, 0).len(), 0);
        // narrow types wrap like a cast
        assert_eq!(initialize_array::<u8>(1, 300)[299], 87);
    }
}
