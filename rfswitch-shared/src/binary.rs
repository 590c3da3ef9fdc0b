//! Conversion between integers and bit lists

use heapless::Vec;

/// Enough bits for any `u32`
pub type Bits = Vec<u8, 32>;

pub trait BitOrder {
    /// Expand `n` into its bits, up to and including the highest set bit.
    /// Zero expands to an empty list.
    fn to_bits(n: u32) -> Bits;

    /// Read the integer stored in `bits[start..=end]`
    fn from_bits(bits: &[u8], start: usize, end: usize) -> u32;
}

/// Least significant bit first
pub struct LsbFirst;

impl BitOrder for LsbFirst {
    fn to_bits(mut n: u32) -> Bits {
        let mut bits = Bits::new();
        while n != 0 {
            // 32 pushes at most
            let _ = bits.push((n & 1) as u8);
            n >>= 1;
        }
        bits
    }

    fn from_bits(bits: &[u8], start: usize, end: usize) -> u32 {
        bits[start..=end]
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit == 1)
            .fold(0, |acc, (i, _)| acc | (1 << i))
    }
}
