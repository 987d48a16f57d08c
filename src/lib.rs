//! # imgcast
//!
//! **Range-preserving dtype conversion for image buffers.**
//!
//! imgcast converts images between numeric representations (bool, signed and
//! unsigned integers of 8/16/32/64 bits, floats of 16/32/64 bits) while
//! preserving relative intensity as faithfully as the output range allows:
//! unsigned integers span their full range, signed integers span
//! [min, max], and floats are normalized to [-1.0, 1.0].
//!
//! ## Why imgcast?
//!
//! - **Intensity-aware**: `255u8` means "white", so it becomes `65535u16`
//!   or `1.0f32`, never a raw cast
//! - **Exact where possible**: bit-width multiples replicate bit patterns
//!   exactly (`0x12u8` -> `0x1212u16`), so u8 -> u16 -> u8 round-trips
//!   losslessly
//! - **Honest about loss**: precision loss, sign loss, and value-safe
//!   downcasts surface as advisory diagnostics, not silent corruption and
//!   not errors
//! - **Zero-copy identity**: converting to the dtype an image already has
//!   aliases the buffer unless a copy is forced
//!
//! ## Quick Start
//!
//! ```
//! use imgcast::prelude::*;
//!
//! let img = Image::from_vec(vec![0u8, 128, 255], &[3])?;
//!
//! let wide = imgcast::to_uint16(&img, false)?;
//! assert_eq!(wide.as_slice::<u16>()?, &[0, 0x8080, 0xffff]);
//!
//! let floats = imgcast::to_float32(&img, false)?;
//! assert_eq!(floats.as_slice::<f32>()?[2], 1.0);
//! # Ok::<(), imgcast::Error>(())
//! ```
//!
//! ## Capturing diagnostics
//!
//! By default advisory notifications go to `tracing::warn!`. To inspect
//! them programmatically, pass an explicit sink:
//!
//! ```
//! use imgcast::prelude::*;
//!
//! let img = Image::from_vec(vec![-5i8], &[1])?;
//! let mut diags = Diagnostics::new();
//! let out = imgcast::convert_with_sink(
//!     &img,
//!     DType::U8,
//!     ConvertOptions::default(),
//!     &mut diags,
//! )?;
//! assert_eq!(out.as_slice::<u8>()?, &[0]);
//! assert!(diags.has(DiagnosticKind::SignLoss));
//! # Ok::<(), imgcast::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod convert;
pub mod dtype;
pub mod error;
pub mod image;

pub use convert::{
    conversion_loses_precision, convert, convert_with_sink, to_bool, to_float, to_float32,
    to_float64, to_int16, to_uint16, to_uint8, ConvertOptions, Diagnostic, DiagnosticKind,
    DiagnosticSink, Diagnostics,
};
pub use dtype::{DType, DTypeSet, Element, Kind};
pub use error::{Error, Result};
pub use image::{Image, ImageData};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::convert::{
        ConvertOptions, Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics,
    };
    pub use crate::dtype::{DType, Element, Kind};
    pub use crate::error::{Error, Result};
    pub use crate::image::{Image, ImageData};
}
