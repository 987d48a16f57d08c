//! Image: dtype-tagged n-dimensional buffer with Arc-based sharing

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Dtype-erased element buffer backing an [`Image`]
///
/// One variant per supported dtype. Kept contiguous and row-major; the
/// converter only ever needs flat element access.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageData {
    /// Boolean elements
    Bool(Vec<bool>),
    /// 8-bit unsigned elements
    U8(Vec<u8>),
    /// 16-bit unsigned elements
    U16(Vec<u16>),
    /// 32-bit unsigned elements
    U32(Vec<u32>),
    /// 64-bit unsigned elements
    U64(Vec<u64>),
    /// 8-bit signed elements
    I8(Vec<i8>),
    /// 16-bit signed elements
    I16(Vec<i16>),
    /// 32-bit signed elements
    I32(Vec<i32>),
    /// 64-bit signed elements
    I64(Vec<i64>),
    /// 16-bit float elements
    F16(Vec<half::f16>),
    /// 16-bit brain float elements (storage only)
    BF16(Vec<half::bf16>),
    /// 32-bit float elements
    F32(Vec<f32>),
    /// 64-bit float elements
    F64(Vec<f64>),
}

impl ImageData {
    /// The dtype stored in this buffer
    pub fn dtype(&self) -> DType {
        match self {
            Self::Bool(_) => DType::Bool,
            Self::U8(_) => DType::U8,
            Self::U16(_) => DType::U16,
            Self::U32(_) => DType::U32,
            Self::U64(_) => DType::U64,
            Self::I8(_) => DType::I8,
            Self::I16(_) => DType::I16,
            Self::I32(_) => DType::I32,
            Self::I64(_) => DType::I64,
            Self::F16(_) => DType::F16,
            Self::BF16(_) => DType::BF16,
            Self::F32(_) => DType::F32,
            Self::F64(_) => DType::F64,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::F16(v) => v.len(),
            Self::BF16(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    /// True if the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw little-endian-native byte view of the buffer
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bool(v) => bytemuck::cast_slice(v),
            Self::U8(v) => v.as_slice(),
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
            Self::U64(v) => bytemuck::cast_slice(v),
            Self::I8(v) => bytemuck::cast_slice(v),
            Self::I16(v) => bytemuck::cast_slice(v),
            Self::I32(v) => bytemuck::cast_slice(v),
            Self::I64(v) => bytemuck::cast_slice(v),
            Self::F16(v) => bytemuck::cast_slice(v),
            Self::BF16(v) => bytemuck::cast_slice(v),
            Self::F32(v) => bytemuck::cast_slice(v),
            Self::F64(v) => bytemuck::cast_slice(v),
        }
    }

    /// Reconstruct a buffer of `dtype` from raw bytes
    ///
    /// Copies the bytes (no alignment requirement on `data`). Boolean
    /// buffers require every byte to be 0 or 1.
    pub fn from_bytes(data: &[u8], dtype: DType) -> Result<Self> {
        let elem = dtype.size_in_bytes();
        if data.len() % elem != 0 {
            return Err(Error::invalid_argument(
                "data",
                format!(
                    "byte length {} is not a multiple of {elem} ({dtype} element size)",
                    data.len()
                ),
            ));
        }
        Ok(match dtype {
            DType::Bool => {
                let mut out = Vec::with_capacity(data.len());
                for &b in data {
                    match b {
                        0 => out.push(false),
                        1 => out.push(true),
                        _ => {
                            return Err(Error::invalid_argument(
                                "data",
                                format!("invalid boolean byte 0x{b:02x}"),
                            ))
                        }
                    }
                }
                Self::Bool(out)
            }
            DType::U8 => Self::U8(data.to_vec()),
            DType::U16 => Self::U16(bytemuck::pod_collect_to_vec(data)),
            DType::U32 => Self::U32(bytemuck::pod_collect_to_vec(data)),
            DType::U64 => Self::U64(bytemuck::pod_collect_to_vec(data)),
            DType::I8 => Self::I8(bytemuck::pod_collect_to_vec(data)),
            DType::I16 => Self::I16(bytemuck::pod_collect_to_vec(data)),
            DType::I32 => Self::I32(bytemuck::pod_collect_to_vec(data)),
            DType::I64 => Self::I64(bytemuck::pod_collect_to_vec(data)),
            DType::F16 => Self::F16(bytemuck::pod_collect_to_vec(data)),
            DType::BF16 => Self::BF16(bytemuck::pod_collect_to_vec(data)),
            DType::F32 => Self::F32(bytemuck::pod_collect_to_vec(data)),
            DType::F64 => Self::F64(bytemuck::pod_collect_to_vec(data)),
        })
    }
}

/// N-dimensional image buffer with a runtime dtype
///
/// `Image` is the single data structure the converter operates on. It
/// consists of:
/// - **Data**: reference-counted element buffer ([`ImageData`])
/// - **Shape**: row-major dimensions
///
/// # Zero-Copy Sharing
///
/// Cloning an `Image` is cheap: the buffer is behind an `Arc`. Identity
/// conversions without `force_copy` return an image that aliases the input
/// buffer; [`Image::shares_data`] makes that observable. Callers must not
/// assume the result of a conversion is independent storage unless they
/// asked for a copy.
///
/// # Example
///
/// ```
/// use imgcast::prelude::*;
///
/// let img = Image::from_vec(vec![0u8, 128, 255], &[3])?;
/// assert_eq!(img.dtype(), DType::U8);
/// assert_eq!(img.shape(), &[3]);
/// # Ok::<(), imgcast::Error>(())
/// ```
#[derive(Clone)]
pub struct Image {
    data: Arc<ImageData>,
    shape: Vec<usize>,
}

impl Image {
    /// Create an image from an owned buffer and shape
    ///
    /// Returns [`Error::ShapeMismatch`] if the element count does not match
    /// the product of the shape dimensions.
    pub fn from_vec<T: Element>(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data: Arc::new(T::into_data(data)),
            shape: shape.to_vec(),
        })
    }

    /// Create an image by copying a slice
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize]) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape)
    }

    /// Create a one-dimensional image from an owned buffer
    pub fn flat<T: Element>(data: Vec<T>) -> Self {
        let shape = vec![data.len()];
        Self {
            data: Arc::new(T::into_data(data)),
            shape,
        }
    }

    /// Reconstruct an image of `dtype` from raw bytes
    pub fn from_bytes(data: &[u8], dtype: DType, shape: &[usize]) -> Result<Self> {
        let buffer = ImageData::from_bytes(data, dtype)?;
        let expected: usize = shape.iter().product();
        if buffer.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                got: buffer.len(),
            });
        }
        Ok(Self {
            data: Arc::new(buffer),
            shape: shape.to_vec(),
        })
    }

    /// Element dtype
    #[inline]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Row-major dimensions
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the image holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying dtype-erased buffer
    #[inline]
    pub fn data(&self) -> &ImageData {
        &self.data
    }

    /// Typed view of the elements
    ///
    /// Returns [`Error::DTypeMismatch`] if `T` does not match the image's
    /// dtype.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        T::data_slice(&self.data).ok_or(Error::DTypeMismatch {
            expected: T::DTYPE,
            got: self.dtype(),
        })
    }

    /// Typed copy of the elements
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        self.as_slice::<T>().map(<[T]>::to_vec)
    }

    /// Raw byte view of the elements
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// True if both images alias the same underlying buffer
    pub fn shares_data(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Copy of this image with independent storage
    pub fn deep_copy(&self) -> Image {
        Image {
            data: Arc::new((*self.data).clone()),
            shape: self.shape.clone(),
        }
    }

    /// New image with the same shape over a freshly produced buffer
    pub(crate) fn with_data(&self, data: ImageData) -> Image {
        debug_assert_eq!(data.len(), self.len());
        Image {
            data: Arc::new(data),
            shape: self.shape.clone(),
        }
    }

    /// Convert this image to `dtype`
    ///
    /// Convenience wrapper around [`crate::convert`].
    pub fn convert(
        &self,
        dtype: DType,
        options: crate::convert::ConvertOptions,
    ) -> Result<Image> {
        crate::convert(self, dtype, options)
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && *self.data == *other.data
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("dtype", &self.dtype())
            .field("shape", &self.shape)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_shape_check() {
        let img = Image::from_vec(vec![1u8, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        assert_eq!(img.shape(), &[2, 3]);
        assert_eq!(img.len(), 6);
        assert_eq!(img.ndim(), 2);

        let err = Image::from_vec(vec![1u8, 2, 3], &[2, 3]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: 6,
                got: 3
            }
        ));
    }

    #[test]
    fn test_typed_access() {
        let img = Image::flat(vec![1.0f32, 2.0]);
        assert_eq!(img.as_slice::<f32>().unwrap(), &[1.0, 2.0]);
        assert!(matches!(
            img.as_slice::<f64>(),
            Err(Error::DTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_clone_aliases_deep_copy_does_not() {
        let img = Image::flat(vec![1u16, 2, 3]);
        let alias = img.clone();
        assert!(img.shares_data(&alias));

        let copy = img.deep_copy();
        assert!(!img.shares_data(&copy));
        assert_eq!(img, copy);
    }

    #[test]
    fn test_byte_roundtrip() {
        let img = Image::from_vec(vec![1u16, 513, 65535], &[3]).unwrap();
        let back = Image::from_bytes(img.as_bytes(), DType::U16, &[3]).unwrap();
        assert_eq!(img, back);
    }

    #[test]
    fn test_bool_bytes_validated() {
        assert!(Image::from_bytes(&[0, 1, 1], DType::Bool, &[3]).is_ok());
        let err = Image::from_bytes(&[0, 2], DType::Bool, &[2]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_from_bytes_length_checks() {
        assert!(matches!(
            Image::from_bytes(&[0u8, 1, 2], DType::U16, &[1]),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            Image::from_bytes(&[0u8, 1, 2, 3], DType::U16, &[3]),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
