use crate::key::{KeyPair, PrivateKeyPem, PublicKeyPem};
use crate::key_size::KeySize;
use crate::naming::ArtifactNames;

pub mod rotator;

/// Capability interface over key generation, rotation and the remote secret store.
///
/// Key material is returned to the caller and never retained by the backend.
pub trait KeyBackend {
    type PublicKey;
    type PrivateKey;
    type Error: std::error::Error;

    /// Generates a new key pair without storing it anywhere.
    #[allow(clippy::type_complexity)]
    fn generate_key_pair(
        &self,
        size: KeySize,
    ) -> Result<KeyPair<Self::PublicKey, Self::PrivateKey>, Self::Error>;

    /// Generates a new key pair and overwrites the remote entries named by `names` with it.
    #[allow(clippy::type_complexity)]
    fn rotate(
        &self,
        names: &ArtifactNames,
        size: KeySize,
    ) -> Result<KeyPair<Self::PublicKey, Self::PrivateKey>, Self::Error>;

    fn fetch_private_key(&self, name: &str) -> Result<Self::PrivateKey, Self::Error>;

    fn fetch_public_key(&self, name: &str) -> Result<Self::PublicKey, Self::Error>;

    fn encode_public_key_pem(&self, key: &Self::PublicKey) -> Result<PublicKeyPem, Self::Error>;

    fn encode_private_key_pem(&self, key: &Self::PrivateKey) -> Result<PrivateKeyPem, Self::Error>;
}
