use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use thiserror::Error;

use crate::key::{KeyPair, PrivateKeyPem, PublicKeyPem};
use crate::key_size::KeySize;

pub use rsa::{RsaPrivateKey, RsaPublicKey};

pub type RsaKeyPair = KeyPair<RsaPublicKey, RsaPrivateKey>;

/// Errors that can occur while generating or (de)serializing RSA keys.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("unable to generate key: `{0}`")]
    UnableToGenerateKey(String),
    #[error("unable to encode public key: `{0}`")]
    PublicKeyEncoding(String),
    #[error("unable to encode private key: `{0}`")]
    PrivateKeyEncoding(String),
    #[error("unable to decode public key: `{0}`")]
    PublicKeyDecoding(String),
    #[error("unable to decode private key: `{0}`")]
    PrivateKeyDecoding(String),
}

/// Generates a new RSA key pair with the given modulus size.
pub fn generate(size: KeySize) -> Result<RsaKeyPair, CodecError> {
    let private_key = RsaPrivateKey::new(&mut OsRng, size.bits())
        .map_err(|e| CodecError::UnableToGenerateKey(e.to_string()))?;

    Ok(KeyPair {
        public_key: private_key.to_public_key(),
        private_key,
    })
}

/// Encodes the public key as a PEM SubjectPublicKeyInfo document (`PUBLIC KEY`).
pub fn encode_public_key(key: &RsaPublicKey) -> Result<PublicKeyPem, CodecError> {
    let pem = key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| CodecError::PublicKeyEncoding(e.to_string()))?;
    Ok(PublicKeyPem::from(pem))
}

/// Encodes the private key as a PEM PKCS#1 document (`RSA PRIVATE KEY`).
pub fn encode_private_key(key: &RsaPrivateKey) -> Result<PrivateKeyPem, CodecError> {
    let pem = key
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| CodecError::PrivateKeyEncoding(e.to_string()))?;
    Ok(PrivateKeyPem::from(pem.as_bytes()))
}

/// Parses a public key from either a `PUBLIC KEY` or an `RSA PUBLIC KEY` PEM document.
pub fn decode_public_key(pem: &str) -> Result<RsaPublicKey, CodecError> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| CodecError::PublicKeyDecoding(e.to_string()))
}

/// Parses a private key from either an `RSA PRIVATE KEY` or a `PRIVATE KEY` PEM document.
pub fn decode_private_key(pem: &str) -> Result<RsaPrivateKey, CodecError> {
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| CodecError::PrivateKeyDecoding(e.to_string()))
}
