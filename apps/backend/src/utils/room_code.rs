//! Room code generation.
//!
//! Room codes are 6-character strings over `A-Z0-9`. Uniqueness against
//! live rooms is the registry's job; this only draws candidates.

use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const ROOM_CODE_LEN: usize = 6;

/// Draw a random room code from the thread-local RNG.
///
/// # Example
/// ```
/// use party_backend::utils::room_code::{generate_room_code, is_valid_room_code};
///
/// let code = generate_room_code();
/// assert!(is_valid_room_code(&code));
/// ```
pub fn generate_room_code() -> String {
    generate_room_code_with(&mut rand::rng())
}

pub fn generate_room_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Canonical form of a user-supplied code: trimmed and upper-cased.
pub fn normalize_room_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

pub fn is_valid_room_code(code: &str) -> bool {
    code.len() == ROOM_CODE_LEN && code.bytes().all(|b| ALPHABET.contains(&b))
}
