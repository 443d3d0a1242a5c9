//! Deterministic short code generation.
//!
//! A code is derived from the URL alone:
//!
//! 1. SHA-256 the URL bytes and keep the first 10 hex characters (40 bits).
//! 2. Read those characters as an unsigned integer, the *seed*.
//! 3. Encode the seed in base-62 (`0-9a-zA-Z`, most significant digit first).
//! 4. Keep at most [`MAX_CODE_LENGTH`] leading characters.
//!
//! The same URL therefore always maps to the same candidate code, across
//! processes and restarts. Collisions between distinct URLs are settled by
//! [`crate::domain::collision`], which perturbs the seed.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

/// Base-62 digits, indexed by value: `0` -> `'0'`, `61` -> `'Z'`.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Longest code ever handed out.
pub const MAX_CODE_LENGTH: usize = 8;

/// Number of leading hex characters of the digest that form the seed.
const SEED_HEX_DIGITS: usize = 10;

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z]{1,8}$").expect("code regex is valid"));

/// A candidate code together with the seed it was encoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: String,
    pub seed: u64,
}

/// Derives the initial candidate code for `url`.
///
/// Accepts any string; URL validation happens before this is called.
///
/// # Examples
///
/// ```ignore
/// let first = generate_code("https://dwarf.io/test-url");
/// let second = generate_code("https://dwarf.io/test-url");
/// assert_eq!(first, second);
/// assert!(first.code.len() <= 8);
/// ```
pub fn generate_code(url: &str) -> GeneratedCode {
    let seed = seed_for(url);

    GeneratedCode {
        code: candidate_for(seed),
        seed,
    }
}

/// Hashes `url` and reads the leading hex digits as an integer.
pub fn seed_for(url: &str) -> u64 {
    let digest = Sha256::digest(url.as_bytes());
    let hex = hex::encode(digest);

    // 10 hex digits are 40 bits, always within u64.
    u64::from_str_radix(&hex[..SEED_HEX_DIGITS], 16).unwrap_or_default()
}

/// Encodes `seed` and truncates it to a code.
pub fn candidate_for(seed: u64) -> String {
    let mut code = encode_base62(seed);
    code.truncate(MAX_CODE_LENGTH);
    code
}

/// Encodes `num` in base-62 without leading zeros. Zero encodes to `"0"`.
pub fn encode_base62(mut num: u64) -> String {
    if num == 0 {
        return "0".to_string();
    }

    let base = ALPHABET.len() as u64;
    let mut digits = Vec::with_capacity(11);

    while num > 0 {
        digits.push(ALPHABET[(num % base) as usize] as char);
        num /= base;
    }

    digits.iter().rev().collect()
}

/// Returns true if `code` could have been produced by the generator.
///
/// Lookups use this to answer "not found" without touching the store.
pub fn is_well_formed_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}
