// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
/** Session token generation

Tokens are opaque bearer strings. They are never verified by a server,
so they only need to be unpredictable enough not to collide. */
use rand::{distr::Alphanumeric, Rng};

/// Prefix carried by every generated token
pub const TOKEN_PREFIX: &str = "mock-jwt-";

/// Default number of random characters after the prefix
const DEFAULT_TOKEN_CHARS: usize = 32;

/// Source of fresh session tokens
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random alphanumeric tokens
#[derive(Debug, Clone, Copy)]
pub struct RandomTokenGenerator {
    chars: usize,
}

impl Default for RandomTokenGenerator {
    fn default() -> Self {
        Self::with_size(DEFAULT_TOKEN_CHARS)
    }
}

impl RandomTokenGenerator {
    /** Generator producing `chars` random characters after the prefix */
    pub fn with_size(chars: usize) -> Self {
        Self { chars }
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.chars)
            .map(char::from)
            .collect();
        format!("{TOKEN_PREFIX}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation() {
        // Generate two tokens and verify they're different
        let generator = RandomTokenGenerator::default();
        let token1 = generator.generate();
        let token2 = generator.generate();

        assert_ne!(token1, token2);
        assert!(token1.starts_with(TOKEN_PREFIX));
        assert_eq!(token1.len(), TOKEN_PREFIX.len() + DEFAULT_TOKEN_CHARS);
        assert!(token1[TOKEN_PREFIX.len()..].chars().all(|c| c.is_ascii_alphanumeric()));

        // Test custom size
        let small_token = RandomTokenGenerator::with_size(8).generate();
        assert!(small_token.len() < token1.len());
    }
}
