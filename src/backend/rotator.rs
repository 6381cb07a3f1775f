use thiserror::Error;
use tracing::debug;

use crate::backend::KeyBackend;
use crate::key::codec::{self, CodecError, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
use crate::key::{PrivateKeyPem, PublicKeyPem};
use crate::key_size::KeySize;
use crate::naming::ArtifactNames;
use crate::secret_store::{NoRemoteStore, SecretStore, SecretStoreError};

#[derive(Error, Debug)]
pub enum KeyRotatorError {
    #[error("key codec error: `{0}`")]
    Codec(#[from] CodecError),
    #[error("secret store error: `{0}`")]
    SecretStore(#[from] SecretStoreError),
    #[error("stored value is not valid utf-8")]
    InvalidPemEncoding,
}

/// RSA key backend persisting PEM encoded keys in a [SecretStore].
#[derive(Debug)]
pub struct KeyRotator<S>
where
    S: SecretStore,
{
    store: S,
}

impl<S> KeyRotator<S>
where
    S: SecretStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn put_pem(&self, name: &str, pem: &[u8]) -> Result<(), KeyRotatorError> {
        let value = std::str::from_utf8(pem).map_err(|_| KeyRotatorError::InvalidPemEncoding)?;
        self.store.put_secret(name, value)?;
        Ok(())
    }
}

impl KeyRotator<NoRemoteStore> {
    /// A rotator that can only generate and encode keys locally.
    pub fn local() -> Self {
        Self::new(NoRemoteStore)
    }
}

impl<S> KeyBackend for KeyRotator<S>
where
    S: SecretStore,
{
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;
    type Error = KeyRotatorError;

    fn generate_key_pair(&self, size: KeySize) -> Result<RsaKeyPair, KeyRotatorError> {
        debug!(bits = size.bits(), "generating RSA key pair");
        Ok(codec::generate(size)?)
    }

    fn rotate(&self, names: &ArtifactNames, size: KeySize) -> Result<RsaKeyPair, KeyRotatorError> {
        let key_pair = self.generate_key_pair(size)?;
        let private_pem = self.encode_private_key_pem(&key_pair.private_key)?;
        let public_pem = self.encode_public_key_pem(&key_pair.public_key)?;

        // private entry first, then public
        debug!(name = %names.private, "storing private key");
        self.put_pem(&names.private, private_pem.as_bytes())?;
        debug!(name = %names.public, "storing public key");
        self.put_pem(&names.public, public_pem.as_bytes())?;

        Ok(key_pair)
    }

    fn fetch_private_key(&self, name: &str) -> Result<RsaPrivateKey, KeyRotatorError> {
        debug!(name, "fetching private key");
        let pem = self.store.get_secret(name)?;
        Ok(codec::decode_private_key(&pem)?)
    }

    fn fetch_public_key(&self, name: &str) -> Result<RsaPublicKey, KeyRotatorError> {
        debug!(name, "fetching public key");
        let pem = self.store.get_secret(name)?;
        Ok(codec::decode_public_key(&pem)?)
    }

    fn encode_public_key_pem(&self, key: &RsaPublicKey) -> Result<PublicKeyPem, KeyRotatorError> {
        Ok(codec::encode_public_key(key)?)
    }

    fn encode_private_key_pem(
        &self,
        key: &RsaPrivateKey,
    ) -> Result<PrivateKeyPem, KeyRotatorError> {
        Ok(codec::encode_private_key(key)?)
    }
}
