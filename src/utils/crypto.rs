use sha2::{Digest, Sha256};

pub const TOKEN_LEN: usize = 8;

/// Random per-run confirmation token: 8 lowercase hex characters.
///
/// 16 bytes from the thread-local CSPRNG are hashed with SHA-256 and the
/// digest's hex prefix is kept.
pub fn generate_token() -> String {
    let seed: [u8; 16] = rand::random();
    let digest = Sha256::digest(seed);
    let mut token = hex::encode(digest);
    token.truncate(TOKEN_LEN);
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_tokens_do_not_collide() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
