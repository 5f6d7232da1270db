//! Stable question identifiers.
//!
//! An id is the lowercase hex SHA-256 digest of the question text, so it is
//! the same across reloads and restarts and independent of line order.
//! Editing a question's text gives it a new id.

use sha2::{Digest, Sha256};

/// Length of every identifier produced by [`identifier_for`].
pub const ID_LEN: usize = 64;

/// Derive the identifier for a question's text.
pub fn identifier_for(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            identifier_for("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_text_change_changes_id() {
        assert_ne!(
            identifier_for("Capital of France?"),
            identifier_for("Capital of France ?")
        );
    }

    proptest! {
        #[test]
        fn identifier_is_deterministic(text in "\\PC*") {
            let first = identifier_for(&text);
            prop_assert_eq!(&first, &identifier_for(&text));
            prop_assert_eq!(first.len(), ID_LEN);
            prop_assert!(first.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        }
    }
}
