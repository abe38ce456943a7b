/// Returns whether the bit at `pos` is set, counting from the most significant bit.
#[inline(always)]
pub fn bit_at(pos: u8, byte: u8) -> bool {
    (byte >> (7 - pos)) & 1 == 1
}

/// Extracts a set of named single-bit flags from `byte`. Positions count from the most
/// significant bit, and any bit not named is treated as reserved and ignored.
pub fn bits<const N: usize>(byte: u8, positions: [u8; N]) -> [bool; N] {
    positions.map(|pos| bit_at(pos, byte))
}
