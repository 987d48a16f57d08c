//! Data type system for imgcast images
//!
//! This module provides the `DType` enum representing all supported element
//! types, the coarse `Kind` classification the converter dispatches on, and
//! the canonical intensity ranges each dtype spans.

mod element;

pub use element::Element;

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Coarse classification of a dtype, used for conversion dispatch
///
/// Conversion semantics depend only on the `(Kind, Kind)` pair plus the
/// byte widths involved, so the converter matches on this enum rather than
/// on full dtype pairs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Boolean
    Bool,
    /// Unsigned integer
    Uint,
    /// Signed integer
    Int,
    /// Floating point
    Float,
}

impl Kind {
    /// Returns true for the two integer kinds
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Uint | Self::Int)
    }
}

/// Data types supported by imgcast images
///
/// This enum represents the element type of an image at runtime.
/// Using an enum (rather than generics) allows runtime dtype selection and
/// keeps the conversion dispatch an exhaustive match.
///
/// # Discriminant Values (Serialization Stability)
///
/// The discriminant values are **stable** for serialization purposes:
/// - Floats: 0-9 (F64=0, F32=1, F16=2, BF16=3)
/// - Signed ints: 10-19 (I64=10, I32=11, I16=12, I8=13)
/// - Unsigned ints: 20-29 (U64=20, U32=21, U16=22, U8=23)
/// - Bool: 30
///
/// New types will use reserved ranges. Existing values are NEVER changed.
///
/// # Intensity Ranges
///
/// Every dtype has a canonical intensity range: booleans span {false, true},
/// integers span their full representable range, and floats are normalized
/// to [-1.0, 1.0]. See [`DType::range_min`] and [`DType::range_max`].
///
/// `BF16` is a storage-only dtype: images may hold it, but [`crate::convert`]
/// rejects it because brain floats are not part of the normalized-intensity
/// contract (see [`DTypeSet::SUPPORTED`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    // Floating point types (0-9)
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point (most common)
    F32 = 1,
    /// 16-bit floating point (IEEE 754)
    F16 = 2,
    /// 16-bit brain floating point (storage only, not convertible)
    BF16 = 3,

    // Integer types
    /// 64-bit signed integer
    I64 = 10,
    /// 32-bit signed integer
    I32 = 11,
    /// 16-bit signed integer
    I16 = 12,
    /// 8-bit signed integer
    I8 = 13,

    // Unsigned integer types
    /// 64-bit unsigned integer
    U64 = 20,
    /// 32-bit unsigned integer
    U32 = 21,
    /// 16-bit unsigned integer
    U16 = 22,
    /// 8-bit unsigned integer
    U8 = 23,

    /// Boolean type
    Bool = 30,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 | Self::U64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F16 | Self::BF16 | Self::I16 | Self::U16 => 2,
            Self::I8 | Self::U8 | Self::Bool => 1,
        }
    }

    /// Size of one element in bits
    #[inline]
    pub const fn bits(self) -> u32 {
        (self.size_in_bytes() * 8) as u32
    }

    /// The coarse kind of this dtype
    #[inline]
    pub const fn kind(self) -> Kind {
        match self {
            Self::F64 | Self::F32 | Self::F16 | Self::BF16 => Kind::Float,
            Self::I64 | Self::I32 | Self::I16 | Self::I8 => Kind::Int,
            Self::U64 | Self::U32 | Self::U16 | Self::U8 => Kind::Uint,
            Self::Bool => Kind::Bool,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self.kind(), Kind::Float)
    }

    /// Returns true if this is a signed integer type
    #[inline]
    pub const fn is_signed_int(self) -> bool {
        matches!(self.kind(), Kind::Int)
    }

    /// Returns true if this is an unsigned integer type
    #[inline]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(self.kind(), Kind::Uint)
    }

    /// Returns true if this is any integer type (signed or unsigned)
    #[inline]
    pub const fn is_int(self) -> bool {
        self.kind().is_integer()
    }

    /// Returns true if this is a boolean type
    #[inline]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Returns true if this type can represent negative values
    #[inline]
    pub const fn is_signed(self) -> bool {
        self.is_float() || self.is_signed_int()
    }

    /// Short name for display (e.g., "f32", "u8")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::I16 => "i16",
            Self::I8 => "i8",
            Self::U64 => "u64",
            Self::U32 => "u32",
            Self::U16 => "u16",
            Self::U8 => "u8",
            Self::Bool => "bool",
        }
    }

    /// Lower end of the canonical intensity range, as f64
    ///
    /// Booleans and unsigned integers start at 0, signed integers at their
    /// representable minimum, and floats at -1.0 (normalized intensity).
    ///
    /// For `i64`/`u64` the endpoints are not exactly representable in f64;
    /// use [`DType::int_min`]/[`DType::int_max`] internally for exact math.
    pub fn range_min(self) -> f64 {
        match self.kind() {
            Kind::Bool | Kind::Uint => 0.0,
            Kind::Int => self.int_min() as f64,
            Kind::Float => -1.0,
        }
    }

    /// Upper end of the canonical intensity range, as f64
    pub fn range_max(self) -> f64 {
        match self.kind() {
            Kind::Bool => 1.0,
            Kind::Uint | Kind::Int => self.int_max() as f64,
            Kind::Float => 1.0,
        }
    }

    /// Intensity limits of this dtype as a `(min, max)` pair
    ///
    /// With `clip_negative` set, the lower limit is clamped to 0 even for
    /// signed dtypes, giving the positive intensity range.
    pub fn limits(self, clip_negative: bool) -> (f64, f64) {
        let min = if clip_negative {
            0.0
        } else {
            self.range_min()
        };
        (min, self.range_max())
    }

    /// Exact integer minimum for integer and boolean dtypes
    ///
    /// Zero for bool and unsigned types. Must not be called on floats.
    pub(crate) fn int_min(self) -> i128 {
        debug_assert!(!self.is_float());
        match self.kind() {
            Kind::Int => -(1i128 << (self.bits() - 1)),
            _ => 0,
        }
    }

    /// Exact integer maximum for integer and boolean dtypes
    pub(crate) fn int_max(self) -> i128 {
        debug_assert!(!self.is_float());
        match self.kind() {
            Kind::Bool => 1,
            Kind::Uint => (1i128 << self.bits()) - 1,
            Kind::Int => (1i128 << (self.bits() - 1)) - 1,
            Kind::Float => 0,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "f64" => Ok(Self::F64),
            "f32" => Ok(Self::F32),
            "f16" => Ok(Self::F16),
            "bf16" => Ok(Self::BF16),
            "i64" => Ok(Self::I64),
            "i32" => Ok(Self::I32),
            "i16" => Ok(Self::I16),
            "i8" => Ok(Self::I8),
            "u64" => Ok(Self::U64),
            "u32" => Ok(Self::U32),
            "u16" => Ok(Self::U16),
            "u8" => Ok(Self::U8),
            "bool" => Ok(Self::Bool),
            _ => Err(Error::invalid_argument(
                "dtype",
                format!("unknown dtype name '{s}'"),
            )),
        }
    }
}

/// Set of dtypes for efficient membership testing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DTypeSet {
    bits: u64,
}

impl DTypeSet {
    /// All floating point types
    pub const FLOATS: Self = Self {
        bits: (1 << DType::F64 as u8)
            | (1 << DType::F32 as u8)
            | (1 << DType::F16 as u8)
            | (1 << DType::BF16 as u8),
    };

    /// All signed integer types
    pub const SIGNED_INTS: Self = Self {
        bits: (1 << DType::I64 as u8)
            | (1 << DType::I32 as u8)
            | (1 << DType::I16 as u8)
            | (1 << DType::I8 as u8),
    };

    /// All unsigned integer types
    pub const UNSIGNED_INTS: Self = Self {
        bits: (1 << DType::U64 as u8)
            | (1 << DType::U32 as u8)
            | (1 << DType::U16 as u8)
            | (1 << DType::U8 as u8),
    };

    /// All integer types
    pub const INTS: Self = Self {
        bits: Self::SIGNED_INTS.bits | Self::UNSIGNED_INTS.bits,
    };

    /// Dtypes accepted by [`crate::convert`] as source or target
    ///
    /// Everything except BF16, which carries no normalized-intensity
    /// semantics and is storage-only.
    pub const SUPPORTED: Self = Self {
        bits: (Self::INTS.bits | Self::FLOATS.bits | (1 << DType::Bool as u8))
            & !(1 << DType::BF16 as u8),
    };

    /// Check if the set contains a dtype
    #[inline]
    pub const fn contains(self, dtype: DType) -> bool {
        self.bits & (1 << dtype as u8) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_size() {
        assert_eq!(DType::F64.size_in_bytes(), 8);
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::F16.size_in_bytes(), 2);
        assert_eq!(DType::I8.size_in_bytes(), 1);
        assert_eq!(DType::Bool.size_in_bytes(), 1);
        assert_eq!(DType::U16.bits(), 16);
    }

    #[test]
    fn test_dtype_categories() {
        assert!(DType::F32.is_float());
        assert!(!DType::I32.is_float());
        assert!(DType::I32.is_signed_int());
        assert!(DType::U32.is_unsigned_int());
        assert!(!DType::U32.is_signed());
        assert_eq!(DType::Bool.kind(), Kind::Bool);
        assert_eq!(DType::BF16.kind(), Kind::Float);
    }

    #[test]
    fn test_intensity_ranges() {
        assert_eq!(DType::U8.range_min(), 0.0);
        assert_eq!(DType::U8.range_max(), 255.0);
        assert_eq!(DType::I16.range_min(), -32768.0);
        assert_eq!(DType::I16.range_max(), 32767.0);
        assert_eq!(DType::F32.range_min(), -1.0);
        assert_eq!(DType::F32.range_max(), 1.0);
        assert_eq!(DType::Bool.range_max(), 1.0);
    }

    #[test]
    fn test_limits_clip_negative() {
        assert_eq!(DType::I16.limits(true), (0.0, 32767.0));
        assert_eq!(DType::I16.limits(false), (-32768.0, 32767.0));
        assert_eq!(DType::U8.limits(true), (0.0, 255.0));
        assert_eq!(DType::F64.limits(false), (-1.0, 1.0));
    }

    #[test]
    fn test_exact_int_limits() {
        assert_eq!(DType::U64.int_max(), u64::MAX as i128);
        assert_eq!(DType::I64.int_min(), i64::MIN as i128);
        assert_eq!(DType::I8.int_min(), -128);
        assert_eq!(DType::I8.int_max(), 127);
        assert_eq!(DType::Bool.int_max(), 1);
    }

    #[test]
    fn test_dtype_set() {
        assert!(DTypeSet::FLOATS.contains(DType::F32));
        assert!(!DTypeSet::FLOATS.contains(DType::I32));
        assert!(DTypeSet::INTS.contains(DType::I32));
        assert!(DTypeSet::SUPPORTED.contains(DType::F16));
        assert!(DTypeSet::SUPPORTED.contains(DType::Bool));
        assert!(!DTypeSet::SUPPORTED.contains(DType::BF16));
    }

    #[test]
    fn test_parse_short_names() {
        for dtype in [
            DType::F64,
            DType::F32,
            DType::F16,
            DType::BF16,
            DType::I64,
            DType::I8,
            DType::U32,
            DType::Bool,
        ] {
            assert_eq!(dtype.short_name().parse::<DType>().unwrap(), dtype);
        }
        assert!("float99".parse::<DType>().is_err());
    }
}
