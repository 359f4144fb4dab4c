//! Codec
//!
//! Pure conversions between fixed-width primitive values and big-endian bytes.
//!
//! ## Widths
//! ```text
//! ┌────────┬──────────────────────────────────┐
//! │ 1 byte │ bool, i8, u8                     │
//! │ 2 byte │ i16, u16, Char16 (UTF-16 unit)   │
//! │ 4 byte │ i32, u32, f32 (IEEE-754 bits)    │
//! │ 8 byte │ i64, u64, f64 (IEEE-754 bits)    │
//! └────────┴──────────────────────────────────┘
//! ```
//!
//! Every encoding is big-endian and `decode(encode(x)) == x` for every value,
//! including NaN payloads since floats travel as raw bit patterns.

use std::fmt;

/// A value with a fixed-size big-endian byte encoding.
///
/// `encode` writes exactly `SIZE` bytes to the front of `out`, `decode` reads
/// exactly `SIZE` bytes from the front of `bytes`. Both panic if the slice is
/// shorter than `SIZE`; callers in this crate always pass exact buffers.
pub trait FixedWidth: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Encoded width in bytes
    const SIZE: usize;

    /// Write the big-endian encoding into `out[..SIZE]`
    fn encode(&self, out: &mut [u8]);

    /// Read a value from `bytes[..SIZE]`
    fn decode(bytes: &[u8]) -> Self;

    /// Encode into a freshly allocated buffer
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::SIZE];
        self.encode(&mut out);
        out
    }
}

/// Copy the first `N` bytes of a slice into an array
fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

impl FixedWidth for bool {
    const SIZE: usize = 1;

    fn encode(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    fn decode(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

macro_rules! impl_fixed_width {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn encode(&self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_be_bytes());
                }

                fn decode(bytes: &[u8]) -> Self {
                    <$ty>::from_be_bytes(array(bytes))
                }
            }
        )*
    };
}

impl_fixed_width!(i8, u8, i16, u16, i32, u32, i64, u64);

impl FixedWidth for f32 {
    const SIZE: usize = 4;

    fn encode(&self, out: &mut [u8]) {
        self.to_bits().encode(out);
    }

    fn decode(bytes: &[u8]) -> Self {
        f32::from_bits(u32::decode(bytes))
    }
}

impl FixedWidth for f64 {
    const SIZE: usize = 8;

    fn encode(&self, out: &mut [u8]) {
        self.to_bits().encode(out);
    }

    fn decode(bytes: &[u8]) -> Self {
        f64::from_bits(u64::decode(bytes))
    }
}

// =============================================================================
// Char16
// =============================================================================

/// A 2-byte character: one UTF-16 code unit.
///
/// Any `u16` is representable, including lone surrogates, so every stored
/// pair of bytes decodes. Only code units that are Unicode scalar values
/// convert to `char`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Char16(pub u16);

impl Char16 {
    /// Code unit for `c`, `None` outside the Basic Multilingual Plane
    pub fn from_char(c: char) -> Option<Self> {
        u16::try_from(u32::from(c)).ok().map(Self)
    }

    pub fn unit(self) -> u16 {
        self.0
    }

    /// The character this unit encodes, `None` for a lone surrogate
    pub fn to_char(self) -> Option<char> {
        char::from_u32(u32::from(self.0))
    }
}

impl From<u16> for Char16 {
    fn from(unit: u16) -> Self {
        Self(unit)
    }
}

impl fmt::Display for Char16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_char() {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "\\u{{{:04x}}}", self.0),
        }
    }
}

impl FixedWidth for Char16 {
    const SIZE: usize = 2;

    fn encode(&self, out: &mut [u8]) {
        self.0.encode(out);
    }

    fn decode(bytes: &[u8]) -> Self {
        Self(u16::decode(bytes))
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Encode any fixed-width value into a new buffer
pub fn encode<T: FixedWidth>(value: T) -> Vec<u8> {
    value.to_bytes()
}

/// Decode any fixed-width value from the front of `bytes`
pub fn decode<T: FixedWidth>(bytes: &[u8]) -> T {
    T::decode(bytes)
}
