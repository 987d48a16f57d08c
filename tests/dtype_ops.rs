//! Integration tests for the dtype system and the precision-loss predicate

use imgcast::prelude::*;
use imgcast::{conversion_loses_precision, DTypeSet};

const ALL: [DType; 12] = [
    DType::Bool,
    DType::U8,
    DType::U16,
    DType::U32,
    DType::U64,
    DType::I8,
    DType::I16,
    DType::I32,
    DType::I64,
    DType::F16,
    DType::F32,
    DType::F64,
];

#[test]
fn test_bool_source_never_loses_precision() {
    for to in ALL {
        assert!(
            !conversion_loses_precision(DType::Bool, to, false),
            "bool -> {to}"
        );
    }
}

#[test]
fn test_bool_target_always_loses_precision() {
    for from in ALL {
        let expected = from != DType::Bool;
        assert_eq!(
            conversion_loses_precision(from, DType::Bool, false),
            expected,
            "{from} -> bool"
        );
    }
}

#[test]
fn test_float_to_int_always_loses_precision() {
    for from in [DType::F16, DType::F32, DType::F64] {
        for to in [
            DType::U8,
            DType::U16,
            DType::U32,
            DType::U64,
            DType::I8,
            DType::I16,
            DType::I32,
            DType::I64,
        ] {
            assert!(conversion_loses_precision(from, to, false), "{from} -> {to}");
        }
    }
}

#[test]
fn test_lossless_pairs() {
    let lossless = [
        // float widening
        (DType::F16, DType::F32),
        (DType::F16, DType::F64),
        (DType::F32, DType::F64),
        // integer into a strictly wider float
        (DType::U8, DType::F16),
        (DType::U8, DType::F32),
        (DType::I8, DType::F16),
        (DType::I16, DType::F32),
        (DType::U16, DType::F32),
        (DType::I32, DType::F64),
        (DType::U32, DType::F64),
        // integer widening of the same signedness
        (DType::U8, DType::U16),
        (DType::U8, DType::U64),
        (DType::I8, DType::I16),
        (DType::I8, DType::I64),
        (DType::U16, DType::U32),
        // signed into unsigned of at least the same width
        (DType::I8, DType::U8),
        (DType::I8, DType::U16),
        (DType::I16, DType::U64),
    ];
    for (from, to) in lossless {
        assert!(!conversion_loses_precision(from, to, false), "{from} -> {to}");
    }
}

#[test]
fn test_lossy_pairs() {
    let lossy = [
        // float narrowing
        (DType::F64, DType::F32),
        (DType::F64, DType::F16),
        (DType::F32, DType::F16),
        // integer into a float that is not strictly wider
        (DType::I16, DType::F16),
        (DType::U16, DType::F16),
        (DType::I32, DType::F32),
        (DType::U32, DType::F32),
        (DType::I64, DType::F64),
        (DType::U64, DType::F64),
        (DType::I64, DType::F16),
        // integer narrowing of the same signedness
        (DType::U16, DType::U8),
        (DType::U64, DType::U32),
        (DType::I16, DType::I8),
        (DType::I64, DType::I8),
        // unsigned into signed of the same or smaller width
        (DType::U8, DType::I8),
        (DType::U16, DType::I16),
        (DType::U32, DType::I8),
        // signed into a strictly narrower unsigned
        (DType::I16, DType::U8),
        (DType::I64, DType::U16),
    ];
    for (from, to) in lossy {
        assert!(conversion_loses_precision(from, to, false), "{from} -> {to}");
    }
}

#[test]
fn test_identity_is_lossless_unless_flagged() {
    for dtype in ALL {
        assert!(
            !conversion_loses_precision(dtype, dtype, false),
            "{dtype} -> {dtype}"
        );
    }
    // the flag marks same-width integer pairs of equal signedness as lossy
    assert!(conversion_loses_precision(DType::U8, DType::U8, true));
    assert!(conversion_loses_precision(DType::I64, DType::I64, true));
    assert!(!conversion_loses_precision(DType::Bool, DType::Bool, true));
    assert!(!conversion_loses_precision(DType::F32, DType::F32, true));
}

#[test]
fn test_limits_match_representable_ranges() {
    assert_eq!(DType::U8.limits(false), (0.0, 255.0));
    assert_eq!(DType::U16.limits(false), (0.0, 65535.0));
    assert_eq!(DType::I8.limits(false), (-128.0, 127.0));
    assert_eq!(DType::I16.limits(false), (-32768.0, 32767.0));
    assert_eq!(DType::I16.limits(true), (0.0, 32767.0));
    assert_eq!(DType::F32.limits(false), (-1.0, 1.0));
    assert_eq!(DType::F32.limits(true), (0.0, 1.0));
    assert_eq!(DType::Bool.limits(false), (0.0, 1.0));
}

#[test]
fn test_display_parse_roundtrip() {
    for dtype in ALL {
        let name = dtype.to_string();
        assert_eq!(name.parse::<DType>().unwrap(), dtype, "{name}");
    }
    assert!(matches!(
        "uint8".parse::<DType>(),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_supported_set_excludes_storage_only() {
    for dtype in ALL {
        assert!(DTypeSet::SUPPORTED.contains(dtype), "{dtype}");
    }
    assert!(!DTypeSet::SUPPORTED.contains(DType::BF16));
}

#[test]
fn test_element_dtype_agreement() {
    assert_eq!(<u8 as Element>::DTYPE, DType::U8);
    assert_eq!(<i16 as Element>::DTYPE, DType::I16);
    assert_eq!(<half::f16 as Element>::DTYPE, DType::F16);
    assert_eq!(<f64 as Element>::DTYPE, DType::F64);
    assert_eq!(<bool as Element>::DTYPE, DType::Bool);
}

#[test]
fn test_typed_access_enforces_dtype() {
    let img = Image::from_vec(vec![1u8, 2, 3], &[3]).unwrap();
    assert_eq!(img.as_slice::<u8>().unwrap(), &[1, 2, 3]);
    assert!(matches!(
        img.as_slice::<u16>(),
        Err(Error::DTypeMismatch { .. })
    ));
}
