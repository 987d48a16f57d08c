//! Bit-width rescaling for integer magnitudes
//!
//! Remaps values occupying `n` significant bits onto `m` significant bits
//! while preserving relative magnitude. Exact replication is possible only
//! when `m` is a multiple of `n`; every other direction goes through a lossy
//! floor division and says so through the diagnostic sink.
//!
//! All arithmetic runs over `i128` so that 64-bit magnitudes never
//! overflow; the transient upscale can reach `o = 126` bits (63 -> 64),
//! and the pre-division product stays below 2^126.

use super::diagnostics::{Diagnostic, DiagnosticSink};
use crate::dtype::DType;

/// Rescale integer magnitudes from `n` significant bits to `m`.
///
/// `from`/`to` are only used to name the endpoints in diagnostics; the
/// caller has already mapped signedness into the bit counts (a signed width
/// contributes `bits - 1` magnitude bits).
///
/// Narrowing is floor division, matching the original remapping semantics
/// for negative magnitudes on the signed-to-unsigned path.
pub(crate) fn rescale_bits(
    values: Vec<i128>,
    n: u32,
    m: u32,
    from: DType,
    to: DType,
    sink: &mut dyn DiagnosticSink,
) -> Vec<i128> {
    debug_assert!(n >= 1 && n <= 64 && m >= 1 && m <= 64);

    if n == m {
        return values;
    }

    if n > m {
        // Value-safe narrowing: when every value already fits in `m` bits,
        // keep the raw values instead of dividing them down. The boundary
        // is strictly `max < 2^m`; it is visible in output bit patterns.
        if let Some(&max) = values.iter().max() {
            if max < (1i128 << m) {
                sink.emit(Diagnostic::downcast(from, to, max));
                return values;
            }
        }
        sink.emit(Diagnostic::precision_loss(from, to));
        let divisor = 1i128 << (n - m);
        return values.into_iter().map(|x| x.div_euclid(divisor)).collect();
    }

    if m % n == 0 {
        // Exact upscale: every n-bit code maps to a distinct, evenly spaced
        // m-bit code spanning the full range (0x12 -> 0x1212 for n=8, m=16).
        let factor = ((1i128 << m) - 1) / ((1i128 << n) - 1);
        return values.into_iter().map(|x| x * factor).collect();
    }

    // Upscale to the next multiple of `n` above `m`, then divide down.
    sink.emit(Diagnostic::precision_loss(from, to));
    let o = (m / n + 1) * n;
    let factor = ((1i128 << o) - 1) / ((1i128 << n) - 1);
    let divisor = 1i128 << (o - m);
    values
        .into_iter()
        .map(|x| (x * factor).div_euclid(divisor))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{DiagnosticKind, Diagnostics};

    fn run(values: Vec<i128>, n: u32, m: u32) -> (Vec<i128>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let out = rescale_bits(values, n, m, DType::U8, DType::U16, &mut diags);
        (out, diags)
    }

    #[test]
    fn test_identity_width() {
        let (out, diags) = run(vec![0, 1, 255], 8, 8);
        assert_eq!(out, vec![0, 1, 255]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_exact_upscale_replicates_bits() {
        // 8 -> 16 bits multiplies by 0x0101
        let (out, diags) = run(vec![0, 0x12, 0xff], 8, 16);
        assert_eq!(out, vec![0, 0x1212, 0xffff]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_exact_upscale_spans_full_range() {
        for (n, m) in [(8u32, 16u32), (8, 24), (8, 32), (16, 32), (8, 64)] {
            let (out, _) = run(vec![(1i128 << n) - 1], n, m);
            assert_eq!(out, vec![(1i128 << m) - 1], "n={n} m={m}");
        }
    }

    #[test]
    fn test_narrowing_divides() {
        let (out, diags) = run(vec![0, 0x1212, 0xffff], 16, 8);
        assert_eq!(out, vec![0, 0x12, 0xff]);
        assert!(diags.has(DiagnosticKind::PrecisionLoss));
        assert!(!diags.has(DiagnosticKind::DowncastWithoutScaling));
    }

    #[test]
    fn test_narrowing_floor_divides_negatives() {
        // 70000 exceeds 2^16, so the value-safe shortcut is off and the
        // division runs; -82565 // 32 floors to -2581, not -2580
        let (out, diags) = run(vec![-82565, 70000], 21, 16);
        assert_eq!(out, vec![-2581, 2187]);
        assert!(diags.has(DiagnosticKind::PrecisionLoss));
    }

    #[test]
    fn test_value_safe_downcast_keeps_raw_values() {
        let (out, diags) = run((0..10).collect(), 64, 15);
        assert_eq!(out, (0..10).collect::<Vec<i128>>());
        assert!(diags.has(DiagnosticKind::DowncastWithoutScaling));
        assert!(!diags.has(DiagnosticKind::PrecisionLoss));
    }

    #[test]
    fn test_downcast_boundary_is_strict() {
        // max == 2^m takes the scaling path, max == 2^m - 1 does not
        let (_, diags) = run(vec![1 << 15], 64, 15);
        assert!(diags.has(DiagnosticKind::PrecisionLoss));

        let (out, diags) = run(vec![(1 << 15) - 1], 64, 15);
        assert_eq!(out, vec![(1 << 15) - 1]);
        assert!(diags.has(DiagnosticKind::DowncastWithoutScaling));
    }

    #[test]
    fn test_non_multiple_upscale() {
        // 8 -> 15 bits: up to 16, factor 257, then halve
        let (out, diags) = run(vec![0, 255], 8, 15);
        assert_eq!(out, vec![0, 32767]);
        assert!(diags.has(DiagnosticKind::PrecisionLoss));
    }

    #[test]
    fn test_empty_input() {
        let (out, _) = run(vec![], 64, 8);
        assert!(out.is_empty());
    }
}
