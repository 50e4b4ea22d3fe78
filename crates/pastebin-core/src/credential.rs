//! Hashing and verification of paste passwords.

use argon2::{
  Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
  Version, password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// Hash and verify opaque secrets.
pub trait CredentialCodec: Send + Sync {
  /// Produce a self-describing hash of `plaintext`.
  fn hash(&self, plaintext: &str) -> Result<String>;

  /// `true` iff `plaintext` matches `hash`. A malformed hash never matches.
  fn verify(&self, hash: &str, plaintext: &str) -> bool;
}

/// argon2id with a fresh random salt per hash; output is a PHC string such as
/// `$argon2id$v=19$…`.
#[derive(Clone, Default)]
pub struct Argon2Codec {
  argon2: Argon2<'static>,
}

impl Argon2Codec {
  pub fn new() -> Self { Self::default() }

  /// Build a codec with explicit cost parameters (memory in KiB, iterations,
  /// lanes).
  pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
    let params = Params::new(m_cost, t_cost, p_cost, None)
      .map_err(|e| Error::Credential(format!("argon2 params: {e}")))?;
    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }
}

impl CredentialCodec for Argon2Codec {
  fn hash(&self, plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    self
      .argon2
      .hash_password(plaintext.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| Error::Credential(format!("argon2 error: {e}")))
  }

  fn verify(&self, hash: &str, plaintext: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
      return false;
    };
    self
      .argon2
      .verify_password(plaintext.as_bytes(), &parsed)
      .is_ok()
  }
}
