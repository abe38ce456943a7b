use log::warn;

/// Decodes a 4-byte synchsafe integer.
///
/// The top bit of every byte is a sync marker and carries no value, so it is discarded and
/// the remaining 7 bits of each byte are concatenated, most significant first, into a 28-bit
/// integer.
pub fn to_u32(raw: [u8; 4]) -> u32 {
    if raw.iter().any(|byte| byte & 0x80 != 0) {
        warn!("synchsafe integer {:02X?} has sync bits set, ignoring them", raw);
    }

    raw.iter()
        .fold(0, |sum, byte| (sum << 7) | u32::from(byte & 0x7F))
}

/// Encodes the lower 28 bits of `value` as a synchsafe integer.
#[cfg(test)]
pub fn from_u32(value: u32) -> [u8; 4] {
    let mut raw = [0; 4];

    for (i, byte) in raw.iter_mut().enumerate() {
        *byte = ((value >> (7 * (3 - i))) & 0x7F) as u8;
    }

    raw
}
