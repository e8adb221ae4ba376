//! Verification codes and session tokens, both from OS randomness.

use rand::{rngs::OsRng, Rng, RngCore};

/// Digits in a verification code.
pub const VERIFICATION_CODE_LENGTH: usize = 6;

/// Random bytes in a session token before hex encoding.
pub const SESSION_TOKEN_BYTES: usize = 16;

/// Fixed-length decimal code sent in verification emails. Leading zeros are
/// significant, hence a string and not a number.
#[must_use]
pub fn verification_code() -> String {
    let mut rng = OsRng;

    (0..VERIFICATION_CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..=9u8)))
        .collect()
}

/// Opaque session token: 16 random bytes, hex encoded (32 characters).
/// Uniqueness rests on collision improbability; there is no store-side check.
///
/// # Errors
///
/// Returns an error if the OS random source fails
pub fn session_token() -> Result<String, rand::Error> {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;

    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_code_shape() {
        for _ in 0..32 {
            let code = verification_code();
            assert_eq!(code.len(), VERIFICATION_CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_session_token_shape() {
        let token = session_token().unwrap();

        assert_eq!(token.len(), SESSION_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_session_tokens_differ() {
        assert_ne!(session_token().unwrap(), session_token().unwrap());
    }
}
