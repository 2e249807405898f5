pub mod identity;
pub mod ip;
pub mod url_validator;

pub use identity::CallerMetadata;
pub use url_validator::{UrlValidationError, is_valid_url, validate_url};

/// 短 ID 字母表（62 个字母数字）
pub const SHORT_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Uniformly random id over [`SHORT_ID_ALPHABET`]. Does not consult the store.
pub fn generate_short_id(length: usize) -> String {
    std::iter::repeat_with(|| {
        SHORT_ID_ALPHABET[rand::random_range(0..SHORT_ID_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}

/// Cheap pre-check before a store lookup.
pub fn is_valid_short_id(id: &str, length: usize) -> bool {
    id.len() == length && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_short_id_shape() {
        for _ in 0..200 {
            let id = generate_short_id(6);
            assert_eq!(id.len(), 6);
            assert!(is_valid_short_id(&id, 6));
        }
    }

    #[test]
    fn test_generate_short_id_is_random() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_short_id(6)).collect();
        // 62^6 空间中 1000 个样本几乎不可能碰撞
        assert!(ids.len() > 990);
    }

    #[test]
    fn test_alphabet() {
        assert_eq!(SHORT_ID_ALPHABET.len(), 62);
        let unique: HashSet<_> = SHORT_ID_ALPHABET.iter().collect();
        assert_eq!(unique.len(), 62);
    }

    #[test]
    fn test_is_valid_short_id() {
        assert!(is_valid_short_id("ab12Cd", 6));
        assert!(!is_valid_short_id("ab12C", 6));
        assert!(!is_valid_short_id("ab12Cde", 6));
        assert!(!is_valid_short_id("ab-2Cd", 6));
        assert!(!is_valid_short_id("ab12Cé", 6));
        assert!(!is_valid_short_id("", 6));
    }
}
