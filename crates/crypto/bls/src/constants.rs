/// Domain separation tag of the proof-of-possession ciphersuite used by the beacon chain.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

pub const PUBLIC_KEY_BYTES_LEN: usize = 48;
pub const SIGNATURE_BYTES_LEN: usize = 96;
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Compressed encoding of the G2 point at infinity.
pub const G2_POINT_AT_INFINITY: [u8; SIGNATURE_BYTES_LEN] = {
    let mut bytes = [0u8; SIGNATURE_BYTES_LEN];
    bytes[0] = 0xc0;
    bytes
};
