//! Base62 slug codec.
//!
//! Maps non-negative integers to short strings and back. The mapping is a bijection:
//! every `u64` has exactly one slug and every accepted slug decodes to exactly one `u64`.
//! Leading zeros are rejected so no two strings decode to the same id.

use thiserror::Error;

/// Slug alphabet, ordered by digit value.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = 62;

/// Longest slug any `u64` encodes to (`u64::MAX` is 11 base62 digits).
pub const MAX_SLUG_LEN: usize = 11;

/// Reasons a string is not a valid slug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,

    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("slug value exceeds the supported range")]
    Overflow,

    #[error("slug {0:?} is not in canonical form")]
    NonCanonical(String),
}

/// Encodes an id as a base62 slug.
///
/// # Examples
///
/// ```
/// use snip::utils::slug_codec::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(id: u64) -> String {
    if id == 0 {
        return "0".to_string();
    }

    let mut buf = [0u8; MAX_SLUG_LEN];
    let mut pos = MAX_SLUG_LEN;
    let mut n = id;

    while n > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(n % BASE) as usize];
        n /= BASE;
    }

    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Decodes a base62 slug back into its id.
///
/// # Errors
///
/// - [`SlugError::Empty`] for the empty string
/// - [`SlugError::InvalidCharacter`] for anything outside `[0-9A-Za-z]`
/// - [`SlugError::Overflow`] when the value does not fit in a `u64`
/// - [`SlugError::NonCanonical`] for leading zeros (e.g. `"007"`)
pub fn decode(slug: &str) -> Result<u64, SlugError> {
    if slug.is_empty() {
        return Err(SlugError::Empty);
    }

    if slug.len() > 1 && slug.starts_with('0') {
        return Err(SlugError::NonCanonical(slug.to_string()));
    }

    let mut value: u64 = 0;
    for (position, ch) in slug.chars().enumerate() {
        let digit = digit_value(ch).ok_or(SlugError::InvalidCharacter { ch, position })?;
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(SlugError::Overflow)?;
    }

    Ok(value)
}

fn digit_value(ch: char) -> Option<u64> {
    let value = match ch {
        '0'..='9' => ch as u64 - '0' as u64,
        'A'..='Z' => ch as u64 - 'A' as u64 + 10,
        'a'..='z' => ch as u64 - 'a' as u64 + 36,
        _ => return None,
    };
    Some(value)
}
