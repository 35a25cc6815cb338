//! Short code generation.
//!
//! Codes are drawn uniformly from ASCII letters and digits minus the visually
//! ambiguous `i`, `I` and `l`. Uniqueness is not checked here; see
//! [`crate::application::services::LinkService::allocate_code`].

use rand::Rng;

/// Code alphabet: 62 alphanumerics minus `i`, `I`, `l`.
pub const ALPHABET: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZabcdefghjkmnopqrstuvwxyz0123456789";

/// Default generated code length.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generates a random code of `len` characters.
///
/// Uses the thread-local OS-seeded generator. Codes are unpredictable enough to
/// avoid collisions; they are not meant as secrets.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(!code.contains(['i', 'I', 'l']));
/// ```
pub fn generate_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `code` could have been produced by [`generate_code`].
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= 32 && code.bytes().all(|b| ALPHABET.contains(&b))
}
