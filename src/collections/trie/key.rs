/// A scalar key usable with [`TrieOrderedMultimap`](super::TrieOrderedMultimap).
///
/// Implementors map themselves onto the low [`BITS`](TrieKey::BITS) bits of a `u64` such that the
/// numeric order of the encodings matches the order of the keys. The trie consumes encodings most
/// significant nibble first, so this is all that's needed for iteration to be ascending.
///
/// Unsigned integers are encoded as-is. Signed integers have their sign bit flipped, which moves
/// negative values below positive ones without disturbing the order within either half.
///
/// An encoding with bits set above [`BITS`](TrieKey::BITS) would alias another key, which debug
/// builds catch with an assertion.
pub trait TrieKey: Copy {
    /// The width of the encoding, between 1 and 64.
    const BITS: u32;

    /// Returns the order-preserving encoding of the key.
    fn to_bits(self) -> u64;

    /// Reverses [`to_bits`](TrieKey::to_bits).
    fn from_bits(bits: u64) -> Self;
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl TrieKey for $t {
            const BITS: u32 = <$t>::BITS;

            fn to_bits(self) -> u64 {
                self as u64
            }

            fn from_bits(bits: u64) -> Self {
                bits as $t
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($t:ty => $u:ty),*) => {$(
        impl TrieKey for $t {
            const BITS: u32 = <$t>::BITS;

            fn to_bits(self) -> u64 {
                ((self as $u) ^ <$t>::MIN as $u) as u64
            }

            fn from_bits(bits: u64) -> Self {
                ((bits as $u) ^ <$t>::MIN as $u) as $t
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64, usize);
impl_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, isize => usize);
