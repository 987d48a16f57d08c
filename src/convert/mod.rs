//! Range-preserving dtype conversion
//!
//! [`convert`] remaps an image between numeric representations while
//! preserving relative intensity as faithfully as the output range allows.
//! Unsigned integers span `[0, max]`, signed integers span `[min, max]`,
//! floats are normalized to `[-1.0, 1.0]`, and booleans threshold at the
//! midpoint of the input range.
//!
//! Conversions that discard information stay non-fatal: they emit advisory
//! [`Diagnostic`]s (precision loss, sign loss, downcast without scaling)
//! through the configured sink. Only malformed inputs fail: dtypes outside
//! the supported set and float values outside `[-1.0, 1.0]`.
//!
//! Output values are always clamped into the target's representable range,
//! never wrapped.
//!
//! # References
//!
//! - DirectX data conversion rules
//! - Data Conversions. In "OpenGL ES 2.0 Specification v2.0.25", pp 7-8.
//!   Khronos Group, 2010.
//! - Proper treatment of pixels as integers. A.W. Paeth.
//!   In "Graphics Gems I", pp 249-256. Morgan Kaufmann, 1990.

mod aliases;
mod diagnostics;
mod scale;

pub use aliases::{
    to_bool, to_float, to_float32, to_float64, to_int16, to_uint16, to_uint8,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics};

use diagnostics::{LogSink, NullSink};
use scale::rescale_bits;

use crate::dtype::{DType, DTypeSet, Kind};
use crate::error::{Error, Result};
use crate::image::{Image, ImageData};

/// Options controlling a conversion
///
/// The defaults match the common case: share the buffer on identity
/// conversions, round-to-nearest quantization, and warnings forwarded to
/// `tracing`.
#[derive(Copy, Clone, Debug)]
pub struct ConvertOptions {
    /// Force a copy of the data even when source and target dtypes match
    pub force_copy: bool,
    /// Uniformly quantize the float range into equal-width integer buckets
    /// instead of round-to-nearest scaling. Round-to-nearest (the default)
    /// minimizes back-and-forth conversion error; uniform buckets trade
    /// that for equal quantization intervals.
    pub uniform: bool,
    /// Forward advisory diagnostics to `tracing::warn!`. Only consulted by
    /// [`convert`]; [`convert_with_sink`] always delivers to its sink.
    pub issue_warnings: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            force_copy: false,
            uniform: false,
            issue_warnings: true,
        }
    }
}

impl ConvertOptions {
    /// Options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether identity conversions must copy
    pub fn force_copy(mut self, force_copy: bool) -> Self {
        self.force_copy = force_copy;
        self
    }

    /// Set uniform bucket quantization for float to integer conversions
    pub fn uniform(mut self, uniform: bool) -> Self {
        self.uniform = uniform;
        self
    }

    /// Set whether diagnostics reach the log
    pub fn issue_warnings(mut self, issue_warnings: bool) -> Self {
        self.issue_warnings = issue_warnings;
        self
    }
}

/// Check whether converting between two dtypes can lose information
///
/// Purely advisory and value-independent: it answers for the dtype pair,
/// not for any particular image, and never blocks a conversion.
///
/// With `int_same_size_lossy` set, integer conversions between equal widths
/// of the same signedness also count as lossy.
pub fn conversion_loses_precision(
    from: DType,
    to: DType,
    int_same_size_lossy: bool,
) -> bool {
    let win = from.size_in_bytes();
    let wout = to.size_in_bytes();
    match (from.kind(), to.kind()) {
        (Kind::Bool, Kind::Bool) => false,
        (_, Kind::Bool) => true,
        (Kind::Float, Kind::Float) => wout < win,
        (Kind::Float, _) => true,
        (_, Kind::Float) => win >= wout,
        (Kind::Int, Kind::Int) | (Kind::Uint, Kind::Uint) => {
            wout < win || (int_same_size_lossy && wout == win)
        }
        (Kind::Uint, Kind::Int) => win >= wout,
        (Kind::Int, Kind::Uint) => wout < win,
        (Kind::Bool, _) => false,
    }
}

/// Convert an image to the requested dtype
///
/// Advisory diagnostics go to `tracing::warn!` unless
/// `options.issue_warnings` is false. See the [module docs](self) for the
/// conversion semantics and [`convert_with_sink`] to capture diagnostics
/// programmatically.
///
/// # Errors
///
/// - [`Error::UnsupportedConversion`] when either dtype is outside the
///   supported set (currently only BF16).
/// - [`Error::OutOfRange`] when a floating point input holds values outside
///   `[-1.0, 1.0]`.
///
/// # Example
///
/// ```
/// use imgcast::prelude::*;
///
/// let img = Image::from_vec(vec![0u8, 128, 255], &[3])?;
/// let wide = imgcast::convert(&img, DType::U16, ConvertOptions::default())?;
/// assert_eq!(wide.as_slice::<u16>()?, &[0, 0x8080, 0xffff]);
/// # Ok::<(), imgcast::Error>(())
/// ```
pub fn convert(image: &Image, dtype: DType, options: ConvertOptions) -> Result<Image> {
    if options.issue_warnings {
        convert_impl(image, dtype, options, &mut LogSink)
    } else {
        convert_impl(image, dtype, options, &mut NullSink)
    }
}

/// Convert an image, delivering diagnostics to a caller-supplied sink
///
/// `options.issue_warnings` is ignored; handing over a sink is the explicit
/// choice of where notifications go.
///
/// # Example
///
/// ```
/// use imgcast::prelude::*;
///
/// let img = Image::from_vec(vec![-5i8], &[1])?;
/// let mut diags = Diagnostics::new();
/// let out = imgcast::convert_with_sink(
///     &img,
///     DType::U8,
///     ConvertOptions::default(),
///     &mut diags,
/// )?;
/// assert_eq!(out.as_slice::<u8>()?, &[0]);
/// assert!(diags.has(DiagnosticKind::SignLoss));
/// # Ok::<(), imgcast::Error>(())
/// ```
pub fn convert_with_sink(
    image: &Image,
    dtype: DType,
    options: ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<Image> {
    convert_impl(image, dtype, options, sink)
}

fn convert_impl(
    image: &Image,
    to: DType,
    options: ConvertOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<Image> {
    let from = image.dtype();

    if from == to {
        return Ok(if options.force_copy {
            image.deep_copy()
        } else {
            image.clone()
        });
    }

    if !DTypeSet::SUPPORTED.contains(from) || !DTypeSet::SUPPORTED.contains(to) {
        return Err(Error::unsupported_conversion(from, to));
    }

    // Integer<->integer loss depends on the values (the downcast shortcut),
    // so the scale helper reports it. Every other pair is decided up front
    // by the pure predicate.
    let integer_pair = from.kind().is_integer() && to.kind().is_integer();
    if !integer_pair && conversion_loses_precision(from, to, false) {
        sink.emit(Diagnostic::precision_loss(from, to));
    }

    let data = match (from.kind(), to.kind()) {
        (Kind::Int | Kind::Float, Kind::Bool) => {
            // values below zero collapse to false
            sink.emit(Diagnostic::sign_loss(from, to));
            ImageData::Bool(any_to_bool(image.data()))
        }
        (_, Kind::Bool) => ImageData::Bool(any_to_bool(image.data())),
        (Kind::Bool, _) => bool_to_any(image.data(), to),
        (Kind::Float, Kind::Float) => {
            check_float_domain(image)?;
            float_to_float(image.data(), to)
        }
        (Kind::Float, _) => {
            check_float_domain(image)?;
            float_to_int(image, to, options.uniform)
        }
        (_, Kind::Float) => int_to_float(image, from, to),
        (Kind::Uint, _) => uint_to_integer(image, from, to, sink),
        (Kind::Int, Kind::Uint) => int_to_uint(image, from, to, sink),
        (Kind::Int, Kind::Int) => int_to_int(image, from, to, sink),
    };

    Ok(image.with_data(data))
}

// ============================================================================
// Boolean arms
// ============================================================================

/// Threshold at the midpoint of the input range: strictly above
/// `range_max / 2` maps to true. The midpoint is taken in the input dtype,
/// so integer inputs compare against a truncated threshold (127 for u8).
fn any_to_bool(data: &ImageData) -> Vec<bool> {
    macro_rules! threshold {
        ($v:expr, $t:ty) => {
            $v.iter().map(|&x| x > <$t>::MAX / 2).collect()
        };
    }

    match data {
        ImageData::U8(v) => threshold!(v, u8),
        ImageData::U16(v) => threshold!(v, u16),
        ImageData::U32(v) => threshold!(v, u32),
        ImageData::U64(v) => threshold!(v, u64),
        ImageData::I8(v) => threshold!(v, i8),
        ImageData::I16(v) => threshold!(v, i16),
        ImageData::I32(v) => threshold!(v, i32),
        ImageData::I64(v) => threshold!(v, i64),
        ImageData::F16(v) => {
            let midpoint = half::f16::from_f32(0.5);
            v.iter().map(|&x| x > midpoint).collect()
        }
        ImageData::F32(v) => v.iter().map(|&x| x > 0.5).collect(),
        ImageData::F64(v) => v.iter().map(|&x| x > 0.5).collect(),
        ImageData::Bool(_) | ImageData::BF16(_) => {
            unreachable!("identity and unsupported dtypes filtered before dispatch")
        }
    }
}

/// Booleans become 0 / range-max (0 / 1.0 for float targets).
fn bool_to_any(data: &ImageData, to: DType) -> ImageData {
    let ImageData::Bool(v) = data else {
        unreachable!("bool source expected");
    };

    macro_rules! fill {
        ($t:ty) => {
            v.iter()
                .map(|&b| if b { <$t>::MAX } else { 0 })
                .collect::<Vec<$t>>()
        };
    }

    match to {
        DType::U8 => ImageData::U8(fill!(u8)),
        DType::U16 => ImageData::U16(fill!(u16)),
        DType::U32 => ImageData::U32(fill!(u32)),
        DType::U64 => ImageData::U64(fill!(u64)),
        DType::I8 => ImageData::I8(fill!(i8)),
        DType::I16 => ImageData::I16(fill!(i16)),
        DType::I32 => ImageData::I32(fill!(i32)),
        DType::I64 => ImageData::I64(fill!(i64)),
        DType::F16 => ImageData::F16(
            v.iter()
                .map(|&b| if b { half::f16::ONE } else { half::f16::ZERO })
                .collect(),
        ),
        DType::F32 => ImageData::F32(v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()),
        DType::F64 => ImageData::F64(v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()),
        DType::Bool | DType::BF16 => {
            unreachable!("identity and unsupported dtypes filtered before dispatch")
        }
    }
}

// ============================================================================
// Float arms
// ============================================================================

/// Floating point inputs must already be normalized; violations are a hard
/// error rather than a clamp, so caller bugs upstream stay visible.
fn check_float_domain(image: &Image) -> Result<()> {
    macro_rules! minmax {
        ($v:expr, $get:expr) => {
            $v.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), x| {
                    let x: f64 = $get(x);
                    (lo.min(x), hi.max(x))
                },
            )
        };
    }

    let (min, max) = match image.data() {
        ImageData::F16(v) => minmax!(v, |x: &half::f16| x.to_f64()),
        ImageData::F32(v) => minmax!(v, |x: &f32| f64::from(*x)),
        ImageData::F64(v) => minmax!(v, |x: &f64| *x),
        _ => unreachable!("float source expected"),
    };

    if min < -1.0 || max > 1.0 {
        return Err(Error::OutOfRange {
            dtype: image.dtype(),
            min,
            max,
        });
    }
    Ok(())
}

/// Float widths share the same normalized range, so this is a plain cast.
fn float_to_float(data: &ImageData, to: DType) -> ImageData {
    match (data, to) {
        (ImageData::F16(v), DType::F32) => {
            ImageData::F32(v.iter().map(|x| x.to_f32()).collect())
        }
        (ImageData::F16(v), DType::F64) => {
            ImageData::F64(v.iter().map(|x| x.to_f64()).collect())
        }
        (ImageData::F32(v), DType::F16) => {
            ImageData::F16(v.iter().map(|&x| half::f16::from_f32(x)).collect())
        }
        (ImageData::F32(v), DType::F64) => {
            ImageData::F64(v.iter().map(|&x| f64::from(x)).collect())
        }
        (ImageData::F64(v), DType::F16) => {
            ImageData::F16(v.iter().map(|&x| half::f16::from_f64(x)).collect())
        }
        (ImageData::F64(v), DType::F32) => {
            ImageData::F32(v.iter().map(|&x| x as f32).collect())
        }
        _ => unreachable!("float-to-float pair expected"),
    }
}

/// Quantize normalized floats into the integer target.
///
/// `$signed` selects between the half-range scaling used for signed targets
/// and the full-max scaling used for unsigned ones; the final clamp keeps
/// every output inside the representable range.
macro_rules! quantize_float_to_int {
    ($xs:expr, $c:ty, $uniform:expr, $to:expr,
     $( $dt:ident => $t:ty : $signed:expr ),+ $(,)?) => {{
        let uniform = $uniform;
        match $to {
            $(
                DType::$dt => ImageData::$dt({
                    let imin = <$t>::MIN as $c;
                    let imax = <$t>::MAX as $c;
                    $xs.iter()
                        .map(|&x| {
                            let y = if $signed {
                                if uniform {
                                    (x * ((imax - imin + 1.0) / 2.0)).floor()
                                } else {
                                    (x * ((imax - imin) / 2.0) - 0.5).round_ties_even()
                                }
                            } else if uniform {
                                x * (imax + 1.0)
                            } else {
                                (x * imax).round_ties_even()
                            };
                            y.clamp(imin, imax) as $t
                        })
                        .collect::<Vec<$t>>()
                }),
            )+
            _ => unreachable!("integer target expected"),
        }
    }};
}

/// Computation runs in a float wide enough for the target integer: f64 when
/// either side is 8 bytes, f32 otherwise (never below f32, even for f16
/// inputs).
fn float_to_int(image: &Image, to: DType, uniform: bool) -> ImageData {
    let wide = image.dtype() == DType::F64 || to.size_in_bytes() == 8;
    if wide {
        let xs = float_values_f64(image.data());
        quantize_float_to_int!(
            xs, f64, uniform, to,
            U8 => u8 : false, U16 => u16 : false, U32 => u32 : false, U64 => u64 : false,
            I8 => i8 : true, I16 => i16 : true, I32 => i32 : true, I64 => i64 : true,
        )
    } else {
        let xs = float_values_f32(image.data());
        quantize_float_to_int!(
            xs, f32, uniform, to,
            U8 => u8 : false, U16 => u16 : false, U32 => u32 : false, U64 => u64 : false,
            I8 => i8 : true, I16 => i16 : true, I32 => i32 : true, I64 => i64 : true,
        )
    }
}

fn float_values_f64(data: &ImageData) -> Vec<f64> {
    match data {
        ImageData::F16(v) => v.iter().map(|x| x.to_f64()).collect(),
        ImageData::F32(v) => v.iter().map(|&x| f64::from(x)).collect(),
        ImageData::F64(v) => v.to_vec(),
        _ => unreachable!("float source expected"),
    }
}

fn float_values_f32(data: &ImageData) -> Vec<f32> {
    match data {
        ImageData::F16(v) => v.iter().map(|x| x.to_f32()).collect(),
        ImageData::F32(v) => v.to_vec(),
        // f64 sources always take the wide path
        _ => unreachable!("narrow float source expected"),
    }
}

/// Map integer magnitudes into the normalized float range: unsigned scales
/// by `1/max` onto `[0, 1]`, signed scales by `2/(max-min)` with a
/// `+min`-compensating offset so the full range lands on `[-1, 1]`
/// (i8 -128 -> -1.0 and 127 -> +1.0 exactly).
macro_rules! int_to_float_values {
    ($data:expr, $c:ty, $factor:expr, $offset:expr) => {{
        let factor = $factor as $c;
        let offset = $offset as $c;
        match $data {
            ImageData::U8(v) => v.iter().map(|&x| x as $c * factor + offset).collect::<Vec<$c>>(),
            ImageData::U16(v) => v.iter().map(|&x| x as $c * factor + offset).collect::<Vec<$c>>(),
            ImageData::U32(v) => v.iter().map(|&x| x as $c * factor + offset).collect::<Vec<$c>>(),
            ImageData::U64(v) => v.iter().map(|&x| x as $c * factor + offset).collect::<Vec<$c>>(),
            ImageData::I8(v) => v.iter().map(|&x| x as $c * factor + offset).collect::<Vec<$c>>(),
            ImageData::I16(v) => v.iter().map(|&x| x as $c * factor + offset).collect::<Vec<$c>>(),
            ImageData::I32(v) => v.iter().map(|&x| x as $c * factor + offset).collect::<Vec<$c>>(),
            ImageData::I64(v) => v.iter().map(|&x| x as $c * factor + offset).collect::<Vec<$c>>(),
            _ => unreachable!("integer source expected"),
        }
    }};
}

fn int_to_float(image: &Image, from: DType, to: DType) -> ImageData {
    // The scale/offset arithmetic always runs in f64 and only then narrows
    // to the target float. Accumulating in f32 overshoots the endpoints
    // (i8 127 maps to 1.0000001 instead of 1.0), which breaks range
    // containment and poisons any follow-up conversion of the output.
    let imin = from.int_min() as f64;
    let imax = from.int_max() as f64;
    let (factor, offset) = if from.is_signed_int() {
        (2.0 / (imax - imin), 1.0 / (imax - imin))
    } else {
        (1.0 / imax, 0.0)
    };

    let ys = int_to_float_values!(image.data(), f64, factor, offset);
    build_float(ys, to)
}

fn build_float(ys: Vec<f64>, to: DType) -> ImageData {
    match to {
        DType::F16 => ImageData::F16(ys.into_iter().map(half::f16::from_f64).collect()),
        DType::F32 => ImageData::F32(ys.into_iter().map(|y| y as f32).collect()),
        DType::F64 => ImageData::F64(ys),
        _ => unreachable!("float target expected"),
    }
}

// ============================================================================
// Integer arms
// ============================================================================

fn int_values(data: &ImageData) -> Vec<i128> {
    macro_rules! widen {
        ($v:expr) => {
            $v.iter().map(|&x| i128::from(x)).collect()
        };
    }

    match data {
        ImageData::U8(v) => widen!(v),
        ImageData::U16(v) => widen!(v),
        ImageData::U32(v) => widen!(v),
        ImageData::U64(v) => widen!(v),
        ImageData::I8(v) => widen!(v),
        ImageData::I16(v) => widen!(v),
        ImageData::I32(v) => widen!(v),
        ImageData::I64(v) => widen!(v),
        _ => unreachable!("integer source expected"),
    }
}

/// Values are guaranteed in range by the scaling/clamping that produced them.
fn build_uint(values: Vec<i128>, to: DType) -> ImageData {
    macro_rules! narrow {
        ($t:ty) => {
            values.into_iter().map(|x| x as $t).collect::<Vec<$t>>()
        };
    }

    match to {
        DType::U8 => ImageData::U8(narrow!(u8)),
        DType::U16 => ImageData::U16(narrow!(u16)),
        DType::U32 => ImageData::U32(narrow!(u32)),
        DType::U64 => ImageData::U64(narrow!(u64)),
        _ => unreachable!("unsigned target expected"),
    }
}

fn build_int(values: Vec<i128>, to: DType) -> ImageData {
    macro_rules! narrow {
        ($t:ty) => {
            values.into_iter().map(|x| x as $t).collect::<Vec<$t>>()
        };
    }

    match to {
        DType::I8 => ImageData::I8(narrow!(i8)),
        DType::I16 => ImageData::I16(narrow!(i16)),
        DType::I32 => ImageData::I32(narrow!(i32)),
        DType::I64 => ImageData::I64(narrow!(i64)),
        _ => unreachable!("signed target expected"),
    }
}

/// Unsigned source: bit-scale the magnitude. A signed target reserves its
/// sign bit, so the magnitude scales to one fewer bit and the result
/// reinterprets cleanly as non-negative signed.
fn uint_to_integer(
    image: &Image,
    from: DType,
    to: DType,
    sink: &mut dyn DiagnosticSink,
) -> ImageData {
    let values = int_values(image.data());
    match to.kind() {
        Kind::Int => {
            let scaled = rescale_bits(values, from.bits(), to.bits() - 1, from, to, sink);
            build_int(scaled, to)
        }
        Kind::Uint => {
            let scaled = rescale_bits(values, from.bits(), to.bits(), from, to, sink);
            build_uint(scaled, to)
        }
        _ => unreachable!("integer target expected"),
    }
}

/// Signed source into an unsigned target: magnitudes scale from the
/// `width - 1` significant bits, negatives clamp to zero afterwards.
fn int_to_uint(
    image: &Image,
    from: DType,
    to: DType,
    sink: &mut dyn DiagnosticSink,
) -> ImageData {
    sink.emit(Diagnostic::sign_loss(from, to));
    let values = int_values(image.data());
    let scaled = rescale_bits(values, from.bits() - 1, to.bits(), from, to, sink);
    build_uint(scaled.into_iter().map(|x| x.max(0)).collect(), to)
}

/// Signed to signed: narrowing scales directly between magnitude widths;
/// widening rebiases to unsigned, scales exactly, and rebiases back.
fn int_to_int(
    image: &Image,
    from: DType,
    to: DType,
    sink: &mut dyn DiagnosticSink,
) -> ImageData {
    let values = int_values(image.data());
    if from.size_in_bytes() > to.size_in_bytes() {
        let scaled = rescale_bits(values, from.bits() - 1, to.bits() - 1, from, to, sink);
        return build_int(scaled, to);
    }

    let imin_in = from.int_min();
    let imin_out = to.int_min();
    let shifted = values.into_iter().map(|x| x - imin_in).collect();
    let scaled = rescale_bits(shifted, from.bits(), to.bits(), from, to, sink);
    build_int(scaled.into_iter().map(|x| x + imin_out).collect(), to)
}
