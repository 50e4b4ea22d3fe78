//! Slug generation and share URLs.

use rand_core::{OsRng, RngCore};

pub const SLUG_LEN: usize = 8;

const ALPHABET: &[u8; 62] =
  b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Largest multiple of the alphabet size that fits in a byte; bytes at or
/// above it are discarded so every symbol is equally likely.
const REJECT_FROM: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// A fresh random slug of [`SLUG_LEN`] alphanumeric characters.
pub fn generate() -> String {
  let mut slug = String::with_capacity(SLUG_LEN);
  let mut buf = [0u8; 16];
  while slug.len() < SLUG_LEN {
    OsRng.fill_bytes(&mut buf);
    for byte in buf.into_iter().filter(|b| *b < REJECT_FROM) {
      slug.push(char::from(ALPHABET[usize::from(byte) % ALPHABET.len()]));
      if slug.len() == SLUG_LEN {
        break;
      }
    }
  }
  slug
}

/// The canonical share URL for `slug`, e.g. `https://paste.example/p/Ab3xY9kQ`.
pub fn share_url(base_url: &str, slug: &str) -> String {
  format!("{}/p/{slug}", base_url.trim_end_matches('/'))
}
