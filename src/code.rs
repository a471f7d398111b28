//! Verification-code generation.

use rand::Rng;

/// Characters drawn for phone verification codes.
pub const DIGITS: &[u8] = b"0123456789";

/// Characters drawn for image verification codes.
pub const ALPHANUMERIC: &[u8] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

pub const PHONE_CODE_LENGTH: usize = 6;
pub const IMAGE_CODE_LENGTH: usize = 4;

/// Draw `length` characters uniformly, with replacement, from `charset`.
pub fn generate(charset: &[u8], length: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// Fresh 6-digit phone verification code.
pub fn phone_code() -> String {
    generate(DIGITS, PHONE_CODE_LENGTH)
}

/// Fresh 4-character image verification code.
pub fn image_code() -> String {
    generate(ALPHANUMERIC, IMAGE_CODE_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_have_requested_length() {
        assert_eq!(phone_code().len(), PHONE_CODE_LENGTH);
        assert_eq!(image_code().len(), IMAGE_CODE_LENGTH);
        assert_eq!(generate(DIGITS, 0), "");
    }

    #[test]
    fn test_codes_stay_inside_charset() {
        for _ in 0..100 {
            assert!(phone_code().bytes().all(|b| DIGITS.contains(&b)));
            assert!(image_code().bytes().all(|b| ALPHANUMERIC.contains(&b)));
        }
    }

    #[test]
    fn test_consecutive_draws_differ() {
        // 32 alphanumerics collide with probability ~2^-190; a repeat
        // means the source of randomness is broken.
        let first = generate(ALPHANUMERIC, 32);
        let second = generate(ALPHANUMERIC, 32);
        assert_ne!(first, second);
    }
}
