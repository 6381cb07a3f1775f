pub mod codec;

/// Represents a PEM-encoded public key "byte string".
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKeyPem(Vec<u8>);

/// Represents a PEM-encoded private key "byte string".
#[derive(Clone, PartialEq)]
pub struct PrivateKeyPem(Vec<u8>);

impl<S: AsRef<[u8]>> From<S> for PublicKeyPem {
    fn from(key: S) -> Self {
        PublicKeyPem(key.as_ref().to_vec())
    }
}

impl<S: AsRef<[u8]>> From<S> for PrivateKeyPem {
    fn from(key: S) -> Self {
        PrivateKeyPem(key.as_ref().to_vec())
    }
}

impl PublicKeyPem {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl PrivateKeyPem {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Private key material must not end up in logs.
impl std::fmt::Debug for PrivateKeyPem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrivateKeyPem").field(&"<redacted>").finish()
    }
}

/// A pair of cryptographic keys, consisting of a public key and a private key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair<P, S> {
    pub public_key: P,
    pub private_key: S,
}
