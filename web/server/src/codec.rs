//! Encrypted session export.
//!
//! Payloads are sealed with AES-128-CBC and PKCS#7 padding under a fresh
//! random IV. Ciphertext and IV travel as standard base64.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

const KEY_LEN: usize = 16;
const IV_LEN: usize = 16;

/// An exported session as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedSession {
    /// Base64 ciphertext.
    pub encrypted_session: String,
    /// Base64 initialization vector.
    pub iv: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("{0} is not valid base64")]
    InvalidEncoding(&'static str),
    #[error("iv must be {IV_LEN} bytes, got {0}")]
    InvalidIv(usize),
    #[error("failed to decrypt the game session")]
    Decrypt,
    #[error("decrypted session is not valid UTF-8")]
    NotUtf8,
}

impl CodecError {
    /// Whether the caller sent a malformed payload, as opposed to one that
    /// failed cryptographically.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::InvalidEncoding(_) | Self::InvalidIv(_))
    }
}

/// Symmetric codec for exported sessions.
#[derive(Clone)]
pub struct SessionCodec {
    key: [u8; KEY_LEN],
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec {
    /// Builds a codec from a passphrase used as a raw key.
    ///
    /// The passphrase bytes are truncated or zero-padded to 16 bytes.
    pub fn new(passphrase: &str) -> Self {
        let mut key = [0u8; KEY_LEN];
        let bytes = passphrase.as_bytes();
        let len = bytes.len().min(KEY_LEN);
        key[..len].copy_from_slice(&bytes[..len]);
        Self { key }
    }

    pub fn encrypt(&self, payload: &str) -> EncryptedSession {
        let iv: [u8; IV_LEN] = rand::random();
        let ciphertext = Aes128CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(payload.as_bytes());

        EncryptedSession {
            encrypted_session: STANDARD.encode(ciphertext),
            iv: STANDARD.encode(iv),
        }
    }

    pub fn decrypt(&self, session: &EncryptedSession) -> Result<String, CodecError> {
        let ciphertext = STANDARD
            .decode(session.encrypted_session.trim())
            .map_err(|_| CodecError::InvalidEncoding("encryptedSession"))?;
        let iv = STANDARD
            .decode(session.iv.trim())
            .map_err(|_| CodecError::InvalidEncoding("iv"))?;

        let decryptor = Aes128CbcDec::new_from_slices(&self.key, &iv)
            .map_err(|_| CodecError::InvalidIv(iv.len()))?;
        let plaintext = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CodecError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CodecError::NotUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_decrypt_restores_payload() {
        let codec = SessionCodec::new("0123456789abcdef");
        let sealed = codec.encrypt(r#"{"balance":100000}"#);

        assert_eq!(
            codec.decrypt(&sealed).as_deref(),
            Ok(r#"{"balance":100000}"#)
        );
        assert_eq!(STANDARD.decode(&sealed.iv).map(|iv| iv.len()), Ok(IV_LEN));
    }

    #[test]
    fn each_export_uses_a_fresh_iv() {
        let codec = SessionCodec::new("0123456789abcdef");
        let first = codec.encrypt("same");
        let second = codec.encrypt("same");
        assert_ne!(first.iv, second.iv);
        assert_ne!(first.encrypted_session, second.encrypted_session);
    }

    #[test]
    fn short_passphrase_is_zero_padded() {
        let short = SessionCodec::new("secret");
        let padded = SessionCodec::new("secret\0\0\0\0\0\0\0\0\0\0");
        let sealed = short.encrypt("payload");
        assert_eq!(padded.decrypt(&sealed).as_deref(), Ok("payload"));
    }

    #[test]
    fn malformed_inputs_are_reported() {
        let codec = SessionCodec::new("0123456789abcdef");
        let sealed = codec.encrypt("payload");

        let bad_base64 = EncryptedSession {
            encrypted_session: "***".into(),
            iv: sealed.iv.clone(),
        };
        assert_eq!(
            codec.decrypt(&bad_base64),
            Err(CodecError::InvalidEncoding("encryptedSession"))
        );

        let short_iv = EncryptedSession {
            encrypted_session: sealed.encrypted_session.clone(),
            iv: STANDARD.encode([0u8; 8]),
        };
        assert_eq!(codec.decrypt(&short_iv), Err(CodecError::InvalidIv(8)));
        assert!(CodecError::InvalidIv(8).is_malformed_input());
        assert!(!CodecError::Decrypt.is_malformed_input());
    }

    #[test]
    fn truncated_ciphertext_fails_to_decrypt() {
        let codec = SessionCodec::new("0123456789abcdef");
        let sealed = codec.encrypt("a payload long enough for two blocks");
        let mut bytes = STANDARD.decode(&sealed.encrypted_session).expect("decode");
        bytes.truncate(bytes.len() - 3);

        let tampered = EncryptedSession {
            encrypted_session: STANDARD.encode(bytes),
            iv: sealed.iv,
        };
        assert_eq!(codec.decrypt(&tampered), Err(CodecError::Decrypt));
    }
}
