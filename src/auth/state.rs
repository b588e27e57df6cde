use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the CSRF state value sent with every authorization request.
pub const STATE_TOKEN_LENGTH: usize = 16;

/// Produces random strings over `A-Z a-z 0-9` for use as CSRF state values.
///
/// Characters are drawn uniformly, with replacement, from the thread-local
/// generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenGenerator;

impl RandomTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Returns exactly `length` characters; a length of zero is treated as one.
    pub fn generate(&self, length: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length.max(1))
            .map(char::from)
            .collect()
    }

    pub fn state_token(&self) -> String {
        self.generate(STATE_TOKEN_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_requested_length_from_alphabet() {
        let generator = RandomTokenGenerator::new();
        for length in [1, 2, 16, 64] {
            let token = generator.generate(length);
            assert_eq!(token.chars().count(), length);
            assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn zero_length_is_clamped_to_one() {
        assert_eq!(RandomTokenGenerator::new().generate(0).len(), 1);
    }

    #[test]
    fn state_tokens_are_sixteen_chars_and_vary() {
        let generator = RandomTokenGenerator::new();
        let tokens: HashSet<String> = (0..32).map(|_| generator.state_token()).collect();
        assert!(tokens.iter().all(|token| token.len() == STATE_TOKEN_LENGTH));
        assert!(tokens.len() > 1);
    }
}
