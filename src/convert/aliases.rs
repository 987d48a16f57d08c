//! Fixed-target conversion entry points
//!
//! Thin wrappers over [`convert`](super::convert) for the common targets.
//! Diagnostics go to the default `tracing` sink; use
//! [`convert_with_sink`](super::convert_with_sink) to capture them.

use super::{convert, ConvertOptions};
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::image::Image;

fn convert_to(image: &Image, dtype: DType, force_copy: bool) -> Result<Image> {
    convert(image, dtype, ConvertOptions::default().force_copy(force_copy))
}

/// Convert an image to single-precision (32-bit) floating point format.
///
/// Integer inputs are scaled onto [0, 1] (unsigned) or [-1, 1] (signed);
/// float inputs are cast without rescaling.
pub fn to_float32(image: &Image, force_copy: bool) -> Result<Image> {
    convert_to(image, DType::F32, force_copy)
}

/// Convert an image to double-precision (64-bit) floating point format.
pub fn to_float64(image: &Image, force_copy: bool) -> Result<Image> {
    convert_to(image, DType::F64, force_copy)
}

/// Ensure that an image is of floating point type.
///
/// Images that are already floating point (any precision) pass through
/// unchanged; everything else converts to `default_dtype`.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `default_dtype` is not a float dtype,
/// plus the usual [`convert`](super::convert) errors.
pub fn to_float(image: &Image, force_copy: bool, default_dtype: DType) -> Result<Image> {
    if !default_dtype.is_float() {
        return Err(Error::invalid_argument(
            "default_dtype",
            format!("expected a float dtype, got {default_dtype}"),
        ));
    }

    if image.dtype().is_float() {
        return Ok(if force_copy {
            image.deep_copy()
        } else {
            image.clone()
        });
    }

    convert_to(image, default_dtype, force_copy)
}

/// Convert an image to 16-bit unsigned integer format.
///
/// Negative input values are clipped; positive values scale onto
/// [0, 65535].
pub fn to_uint16(image: &Image, force_copy: bool) -> Result<Image> {
    convert_to(image, DType::U16, force_copy)
}

/// Convert an image to 16-bit signed integer format.
///
/// Values scale onto [-32768, 32767]. Positive-only inputs (e.g. u8)
/// produce positive-only outputs.
pub fn to_int16(image: &Image, force_copy: bool) -> Result<Image> {
    convert_to(image, DType::I16, force_copy)
}

/// Convert an image to 8-bit unsigned integer format.
///
/// Negative input values are clipped; positive values scale onto [0, 255].
pub fn to_uint8(image: &Image, force_copy: bool) -> Result<Image> {
    convert_to(image, DType::U8, force_copy)
}

/// Convert an image to boolean format.
///
/// The upper half of the input dtype's positive range is true, the lower
/// half false. Negative values (if present) are always false.
pub fn to_bool(image: &Image, force_copy: bool) -> Result<Image> {
    convert_to(image, DType::Bool, force_copy)
}
