//! Tests for the big-endian codec
//!
//! These tests verify:
//! - Known byte images for every width
//! - Exhaustive round-trips for 1 and 2 byte types, including UTF-16 chars
//! - Sampled round-trips for 4 and 8 byte types (proptest)
//! - Float bit patterns (NaN payloads, signed zero) survive unchanged

use atlasstore::codec::{decode, encode, Char16, FixedWidth};
use proptest::prelude::*;

// =============================================================================
// Helper Functions
// =============================================================================

fn round_trip<T: FixedWidth>(value: T) -> T {
    decode::<T>(&encode(value))
}

// =============================================================================
// Known Encodings
// =============================================================================

#[test]
fn test_encode_is_big_endian() {
    assert_eq!(encode(0x0102u16), vec![0x01, 0x02]);
    assert_eq!(encode(0x01020304u32), vec![0x01, 0x02, 0x03, 0x04]);
    assert_eq!(
        encode(0x0102030405060708u64),
        vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]
    );
}

#[test]
fn test_encode_negative_values() {
    assert_eq!(encode(-1i8), vec![0xFF]);
    assert_eq!(encode(-2i16), vec![0xFF, 0xFE]);
    assert_eq!(encode(i32::MIN), vec![0x80, 0x00, 0x00, 0x00]);
}

#[test]
fn test_encode_bool() {
    assert_eq!(encode(true), vec![1]);
    assert_eq!(encode(false), vec![0]);
    assert!(decode::<bool>(&[0x7F]));
}

#[test]
fn test_encode_floats_as_ieee_bits() {
    assert_eq!(encode(1.0f32), vec![0x3F, 0x80, 0x00, 0x00]);
    assert_eq!(encode(-2.0f64), vec![0xC0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_widths() {
    assert_eq!(<bool as FixedWidth>::SIZE, 1);
    assert_eq!(<u8 as FixedWidth>::SIZE, 1);
    assert_eq!(<i16 as FixedWidth>::SIZE, 2);
    assert_eq!(<Char16 as FixedWidth>::SIZE, 2);
    assert_eq!(<f32 as FixedWidth>::SIZE, 4);
    assert_eq!(<u64 as FixedWidth>::SIZE, 8);
    assert_eq!(<f64 as FixedWidth>::SIZE, 8);
}

#[test]
fn test_decode_reads_prefix_only() {
    let bytes = [0x00, 0x2A, 0xFF, 0xFF];
    assert_eq!(decode::<u16>(&bytes), 42);
}

// =============================================================================
// Exhaustive Round-Trips (1-2 byte types)
// =============================================================================

#[test]
fn test_round_trip_bool() {
    assert!(round_trip(true));
    assert!(!round_trip(false));
}

#[test]
fn test_round_trip_all_bytes() {
    for value in i8::MIN..=i8::MAX {
        assert_eq!(round_trip(value), value);
    }
    for value in u8::MIN..=u8::MAX {
        assert_eq!(round_trip(value), value);
    }
}

#[test]
fn test_round_trip_all_shorts() {
    for value in i16::MIN..=i16::MAX {
        assert_eq!(round_trip(value), value);
    }
    for value in u16::MIN..=u16::MAX {
        assert_eq!(round_trip(value), value);
    }
}

#[test]
fn test_round_trip_all_chars() {
    for unit in u16::MIN..=u16::MAX {
        let value = Char16(unit);
        assert_eq!(round_trip(value), value);
        assert_eq!(encode(value), unit.to_be_bytes().to_vec());
    }
}

#[test]
fn test_char_conversions() {
    let a = Char16::from_char('A').unwrap();
    assert_eq!(encode(a), vec![0x00, 0x41]);
    assert_eq!(a.to_char(), Some('A'));
    assert_eq!(Char16::from_char('\u{FFFF}'), Some(Char16(0xFFFF)));
    assert_eq!(Char16::from_char('\u{10000}'), None);
    assert_eq!(Char16(0xDC00).to_char(), None);
}

// =============================================================================
// Float Bit Patterns
// =============================================================================

#[test]
fn test_nan_payload_preserved() {
    let nan = f32::from_bits(0x7FC0_1234);
    assert_eq!(round_trip(nan).to_bits(), 0x7FC0_1234);

    let nan = f64::from_bits(0x7FF8_0000_DEAD_BEEF);
    assert_eq!(round_trip(nan).to_bits(), 0x7FF8_0000_DEAD_BEEF);
}

#[test]
fn test_signed_zero_preserved() {
    assert!(round_trip(-0.0f32).is_sign_negative());
    assert!(round_trip(-0.0f64).is_sign_negative());
}

// =============================================================================
// Sampled Round-Trips (4-8 byte types)
// =============================================================================

proptest! {
    #[test]
    fn prop_round_trip_i32(value in any::<i32>()) {
        prop_assert_eq!(round_trip(value), value);
    }

    #[test]
    fn prop_round_trip_u32(value in any::<u32>()) {
        prop_assert_eq!(round_trip(value), value);
    }

    #[test]
    fn prop_round_trip_i64(value in any::<i64>()) {
        prop_assert_eq!(round_trip(value), value);
    }

    #[test]
    fn prop_round_trip_u64(value in any::<u64>()) {
        prop_assert_eq!(round_trip(value), value);
    }

    #[test]
    fn prop_round_trip_f32_bits(bits in any::<u32>()) {
        let value = f32::from_bits(bits);
        prop_assert_eq!(round_trip(value).to_bits(), bits);
    }

    #[test]
    fn prop_round_trip_f64_bits(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        prop_assert_eq!(round_trip(value).to_bits(), bits);
    }

    #[test]
    fn prop_encode_matches_to_be_bytes(value in any::<i64>()) {
        prop_assert_eq!(encode(value), value.to_be_bytes().to_vec());
    }
}
