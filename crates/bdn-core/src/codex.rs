//! Codex — base-16/32/64 text encodings and random value generation
//!
//! These are the pure codec functions used by the tag and binary string
//! types. The base-32 alphabet omits `E`, `I`, `O` and `U` so encoded text
//! can never spell words.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::Rng;

use crate::{Error, Result};

/// Base-32 alphabet: digits and upper-case letters without vowels
pub const BASE32_ALPHABET: &str = "0123456789ABCDFGHJKLMNPQRSTVWXYZ";

// ── Base-16 ───────────────────────────────────────────────

/// Encode bytes as lower-case hexadecimal text
pub fn base16_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hexadecimal text (either case) into bytes
pub fn base16_decode(text: &str) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| Error::CodecError(format!("invalid base-16 text: {}", e)))
}

// ── Base-32 ───────────────────────────────────────────────

/// Encode bytes as base-32 text, five bits per character, most significant first
pub fn base32_encode(bytes: &[u8]) -> String {
    let alphabet = BASE32_ALPHABET.as_bytes();
    let mut out = String::with_capacity((bytes.len() * 8 + 4) / 5);
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for &byte in bytes {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(alphabet[((buffer >> bits) & 0x1F) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(alphabet[((buffer << (5 - bits)) & 0x1F) as usize] as char);
    }
    out
}

/// Decode base-32 text; trailing bits that do not fill a byte are dropped
pub fn base32_decode(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for character in text.chars() {
        let value = BASE32_ALPHABET.find(character).ok_or_else(|| {
            Error::CodecError(format!("invalid base-32 character {:?}", character))
        })?;
        buffer = (buffer << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((buffer >> bits) & 0xFF) as u8);
        }
    }
    Ok(out)
}

// ── Base-64 ───────────────────────────────────────────────

/// Encode bytes as standard padded base-64 text
pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base-64 text, ignoring embedded whitespace
pub fn base64_decode(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::CodecError(format!("invalid base-64 text: {}", e)))
}

// ── Randomness ────────────────────────────────────────────

/// Generate `size` cryptographically random bytes
pub fn random_bytes(size: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; size];
    rand::thread_rng().fill(bytes.as_mut_slice());
    bytes
}

/// Generate a fair random boolean
pub fn random_boolean() -> bool {
    rand::thread_rng().gen()
}

/// Generate a random probability in `[0, 1]`
pub fn random_probability() -> f64 {
    rand::thread_rng().gen_range(0.0..=1.0)
}
