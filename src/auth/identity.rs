use sha2::{Digest, Sha256};

/// Hashes the identity provider's subject so the raw id is never stored.
pub fn hash_identity(identity: &str) -> String {
    format!("{:x}", Sha256::digest(identity.trim().as_bytes()))
}
