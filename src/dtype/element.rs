//! Element trait for mapping Rust types to DType

use super::DType;
use crate::image::ImageData;
use bytemuck::NoUninit;

/// Trait for types that can be elements of an image
///
/// This trait connects Rust's type system to imgcast's runtime dtype system.
/// It's implemented for all supported scalar types.
///
/// # Bounds
/// - `Copy + Clone + Send + Sync + 'static` - Basic trait requirements
/// - `NoUninit` - Safe byte views (bytemuck); `Pod` is too strong because
///   `bool` has invalid bit patterns
/// - `PartialOrd` - Comparison for min/max and thresholding
pub trait Element:
    Copy + Clone + Send + Sync + NoUninit + PartialOrd + 'static
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Wrap an owned buffer of this type into dtype-erased image data
    fn into_data(data: Vec<Self>) -> ImageData;

    /// View dtype-erased image data as a slice of this type
    ///
    /// Returns `None` when the data holds a different dtype.
    fn data_slice(data: &ImageData) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($t:ty, $dtype:expr, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            #[inline]
            fn into_data(data: Vec<Self>) -> ImageData {
                ImageData::$variant(data)
            }

            #[inline]
            fn data_slice(data: &ImageData) -> Option<&[Self]> {
                match data {
                    ImageData::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(f64, DType::F64, F64);
impl_element!(f32, DType::F32, F32);
impl_element!(half::f16, DType::F16, F16);
impl_element!(half::bf16, DType::BF16, BF16);
impl_element!(i64, DType::I64, I64);
impl_element!(i32, DType::I32, I32);
impl_element!(i16, DType::I16, I16);
impl_element!(i8, DType::I8, I8);
impl_element!(u64, DType::U64, U64);
impl_element!(u32, DType::U32, U32);
impl_element!(u16, DType::U16, U16);
impl_element!(u8, DType::U8, U8);
impl_element!(bool, DType::Bool, Bool);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_mapping() {
        assert_eq!(<f32 as Element>::DTYPE, DType::F32);
        assert_eq!(<u8 as Element>::DTYPE, DType::U8);
        assert_eq!(<bool as Element>::DTYPE, DType::Bool);
        assert_eq!(<half::f16 as Element>::DTYPE, DType::F16);
    }

    #[test]
    fn test_data_slice_mismatch() {
        let data = u8::into_data(vec![1, 2, 3]);
        assert!(u8::data_slice(&data).is_some());
        assert!(i8::data_slice(&data).is_none());
    }
}
