//! Rendered-subset digests.
//!
//! Simple, deterministic, non-cryptographic:
//!
//! - algorithm: **FNV-1a 64-bit**
//! - input: the UTF-8 bytes of the rendered text
//! - output: `"fnv1a64:<16 lowercase hex digits>"`
//!
//! Not a security primitive; it only identifies prompt text for caching.

pub const DIGEST_PREFIX: &str = "fnv1a64:";

pub fn fnv1a64_digest(bytes: &[u8]) -> String {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    format!("{DIGEST_PREFIX}{hash:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_vectors() {
        assert_eq!(fnv1a64_digest(b""), "fnv1a64:cbf29ce484222325");
        assert_eq!(fnv1a64_digest(b"a"), "fnv1a64:af63dc4c8601ec8c");
    }
}
