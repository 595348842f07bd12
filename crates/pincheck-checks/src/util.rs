//! Helpers shared by the check scripts

use pincheck_core::{Cid, DomainError};
use rand::RngCore;

/// Generates a fresh inline CID for pinning throwaway content.
///
/// The CID is v1 with the raw codec and an identity multihash over random
/// bytes, rendered in base16 multibase. Because the digest IS the content,
/// no two runs ever contend for the same pin, and the service needs no
/// actual data transfer to resolve it.
///
/// # Errors
/// Returns error if the encoded string is rejected as a CID
pub fn inline_cid() -> Result<Cid, DomainError> {
    let mut payload = [0u8; 24];
    rand::rng().fill_bytes(&mut payload);

    // version 1, raw codec, identity hash function, digest length
    let mut bytes = vec![0x01, 0x55, 0x00, payload.len() as u8];
    bytes.extend_from_slice(&payload);

    let mut encoded = String::with_capacity(1 + bytes.len() * 2);
    encoded.push('f');
    for byte in &bytes {
        encoded.push_str(&format!("{byte:02x}"));
    }

    Cid::new(encoded)
}
