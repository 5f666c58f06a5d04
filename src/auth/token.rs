use sha2::{Digest, Sha256};

/// Generate a new opaque API token: 20 random bytes, hex encoded.
pub fn generate() -> String {
    let bytes: [u8; 20] = rand::random();
    hex::encode(bytes)
}

/// Tokens are stored as SHA-256 digests; the raw key is only shown once.
pub fn hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Pull the key out of `Token <key>` or `Bearer <key>`.
pub fn from_authorization(header: &str) -> Option<&str> {
    let (scheme, key) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return None;
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_forty_hex_chars() {
        let token = generate();
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate());
    }

    #[test]
    fn hash_is_stable_and_not_the_token() {
        let token = generate();
        assert_eq!(hash(&token), hash(&token));
        assert_ne!(hash(&token), token);
        assert_eq!(hash(&token).len(), 64);
    }

    #[test]
    fn parses_token_and_bearer_schemes() {
        assert_eq!(from_authorization("Token abc123"), Some("abc123"));
        assert_eq!(from_authorization("Bearer abc123"), Some("abc123"));
        assert_eq!(from_authorization("token abc123"), Some("abc123"));
        assert_eq!(from_authorization("Basic abc123"), None);
        assert_eq!(from_authorization("Token"), None);
        assert_eq!(from_authorization("Token a b"), None);
    }
}
