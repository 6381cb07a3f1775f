use std::fmt;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::backend::KeyBackend;
use crate::key::{KeyPair, PrivateKeyPem, PublicKeyPem};
use crate::key_size::{KeySize, KeySizeError};
use crate::naming::{ArtifactNames, KeyName, KeyNameError, KeyRole};
use crate::persistence::PersistenceGateway;
use crate::report::{KeyPairReport, LocalFiles, Operation};

/// A single local write that could not be completed.
#[derive(Debug, PartialEq)]
pub struct PersistenceFailure {
    pub role: KeyRole,
    pub file_name: String,
    pub reason: String,
}

/// Every local write failure of one operation.
#[derive(Debug, PartialEq)]
pub struct PersistenceFailures {
    pub failures: Vec<PersistenceFailure>,
    /// Whether the remote entries had already been overwritten when the writes failed.
    pub remote_rotated: bool,
}

impl fmt::Display for PersistenceFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to write keys to disk")?;
        for failure in &self.failures {
            write!(
                f,
                "; {} key file `{}`: `{}`",
                failure.role, failure.file_name, failure.reason
            )?;
        }
        if self.remote_rotated {
            write!(
                f,
                ". The remote keys were already rotated, local and remote copies now differ"
            )?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error(transparent)]
    InvalidName(#[from] KeyNameError),
    #[error(transparent)]
    InvalidKeySize(#[from] KeySizeError),
    #[error("failed to generate RSA key pair with size {size} bits: `{reason}`")]
    GenerationFailed { size: KeySize, reason: String },
    #[error(
        "failed to rotate keys `{public}` and `{private}`: `{reason}`. \
         The remote pair may be partially rotated"
    )]
    RotationFailed {
        public: String,
        private: String,
        reason: String,
    },
    #[error("failed to encode {role} key `{name}` to PEM format: `{reason}`")]
    EncodingFailed {
        role: KeyRole,
        name: String,
        reason: String,
    },
    #[error(
        "failed to fetch {role} key `{name}`. Ensure the key exists and you have the \
         necessary permissions: `{reason}`"
    )]
    FetchFailed {
        role: KeyRole,
        name: String,
        reason: String,
    },
    #[error("{0}")]
    PersistenceFailed(PersistenceFailures),
}

/// Runs the generate, store and fetch operations of a key pair.
///
/// Every operation is a linear pipeline that stops at the first failure. Nothing is retried
/// and nothing is rolled back: re-running the command is left to the operator.
pub struct KeyLifecycle<B, P>
where
    B: KeyBackend,
    P: PersistenceGateway,
{
    backend: B,
    persistence: P,
}

impl<B, P> KeyLifecycle<B, P>
where
    B: KeyBackend,
    P: PersistenceGateway,
{
    pub fn new(backend: B, persistence: P) -> Self {
        Self {
            backend,
            persistence,
        }
    }

    /// Generates a new key pair and writes it to local files only.
    pub fn generate(&self, name: &str, size_text: &str) -> Result<KeyPairReport, LifecycleError> {
        let key_name = validate_name(name)?;
        let size = validate_size(size_text)?;
        info!(name = %key_name, bits = size.bits(), "generating new keys");

        let names = ArtifactNames::from(&key_name);
        let key_pair = self.backend.generate_key_pair(size).map_err(|e| {
            error!(bits = size.bits(), "failed to generate RSA key pair: {e}");
            LifecycleError::GenerationFailed {
                size,
                reason: e.to_string(),
            }
        })?;

        let files = self.encode_and_persist(&names, &key_pair, false)?;
        info!(public = %names.public, private = %names.private, "key pair generated");

        Ok(KeyPairReport {
            operation: Operation::Generate,
            key_size: Some(size),
            names,
            files,
        })
    }

    /// Generates a new key pair, overwrites the remote entries with it and writes it locally.
    pub fn rotate_and_store(
        &self,
        name: &str,
        size_text: &str,
    ) -> Result<KeyPairReport, LifecycleError> {
        let key_name = validate_name(name)?;
        let size = validate_size(size_text)?;
        info!(name = %key_name, bits = size.bits(), "rotating keys");

        let names = ArtifactNames::from(&key_name);
        let key_pair = self.backend.rotate(&names, size).map_err(|e| {
            error!(
                public = %names.public,
                private = %names.private,
                "error rotating keys: {e}"
            );
            LifecycleError::RotationFailed {
                public: names.public.clone(),
                private: names.private.clone(),
                reason: e.to_string(),
            }
        })?;

        let files = self.encode_and_persist(&names, &key_pair, true)?;
        info!(public = %names.public, private = %names.private, "keys rotated and stored");

        Ok(KeyPairReport {
            operation: Operation::Store,
            key_size: Some(size),
            names,
            files,
        })
    }

    /// Downloads the current key pair and writes it locally.
    ///
    /// The private key is fetched first; if that fails the public key is not requested.
    pub fn fetch_existing(&self, name: &str) -> Result<KeyPairReport, LifecycleError> {
        let key_name = validate_name(name)?;
        info!(name = %key_name, "fetching keys");

        let names = ArtifactNames::from(&key_name);
        let private_key = self
            .backend
            .fetch_private_key(&names.private)
            .map_err(|e| fetch_failed(KeyRole::Private, &names.private, e))?;
        let public_key = self
            .backend
            .fetch_public_key(&names.public)
            .map_err(|e| fetch_failed(KeyRole::Public, &names.public, e))?;

        let key_pair = KeyPair {
            public_key,
            private_key,
        };
        let files = self.encode_and_persist(&names, &key_pair, false)?;
        info!(public = %names.public, private = %names.private, "keys downloaded");

        Ok(KeyPairReport {
            operation: Operation::Fetch,
            key_size: None,
            names,
            files,
        })
    }

    fn encode_and_persist(
        &self,
        names: &ArtifactNames,
        key_pair: &KeyPair<B::PublicKey, B::PrivateKey>,
        remote_rotated: bool,
    ) -> Result<LocalFiles, LifecycleError> {
        let (public_pem, private_pem) = self.encode(names, key_pair)?;
        self.persist(names, &public_pem, &private_pem, remote_rotated)
    }

    fn encode(
        &self,
        names: &ArtifactNames,
        key_pair: &KeyPair<B::PublicKey, B::PrivateKey>,
    ) -> Result<(PublicKeyPem, PrivateKeyPem), LifecycleError> {
        let public_pem = self
            .backend
            .encode_public_key_pem(&key_pair.public_key)
            .map_err(|e| encoding_failed(KeyRole::Public, &names.public, e))?;
        let private_pem = self
            .backend
            .encode_private_key_pem(&key_pair.private_key)
            .map_err(|e| encoding_failed(KeyRole::Private, &names.private, e))?;
        Ok((public_pem, private_pem))
    }

    /// Writes both files. The second write is attempted even when the first one fails so that
    /// every failure gets reported.
    fn persist(
        &self,
        names: &ArtifactNames,
        public_pem: &PublicKeyPem,
        private_pem: &PrivateKeyPem,
        remote_rotated: bool,
    ) -> Result<LocalFiles, LifecycleError> {
        let public = self.write(names, KeyRole::Public, public_pem.as_bytes());
        let private = self.write(names, KeyRole::Private, private_pem.as_bytes());

        match (public, private) {
            (Ok(public), Ok(private)) => Ok(LocalFiles { public, private }),
            (public, private) => {
                let failures = [public.err(), private.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                if remote_rotated {
                    warn!("remote keys were rotated but could not be saved locally");
                }
                Err(LifecycleError::PersistenceFailed(PersistenceFailures {
                    failures,
                    remote_rotated,
                }))
            }
        }
    }

    fn write(
        &self,
        names: &ArtifactNames,
        role: KeyRole,
        data: &[u8],
    ) -> Result<std::path::PathBuf, PersistenceFailure> {
        let file_name = names.local_file_name(role);
        self.persistence
            .write_file(file_name, role, data)
            .map_err(|e| {
                error!(file = file_name, %role, "failed to write key to file: {e}");
                PersistenceFailure {
                    role,
                    file_name: file_name.to_string(),
                    reason: e.to_string(),
                }
            })
    }
}

fn validate_name(name: &str) -> Result<KeyName, LifecycleError> {
    KeyName::try_from(name).map_err(|e| {
        error!("{e}");
        LifecycleError::from(e)
    })
}

fn validate_size(size_text: &str) -> Result<KeySize, LifecycleError> {
    KeySize::validate(size_text).map_err(|e| {
        error!("{e}");
        LifecycleError::from(e)
    })
}

fn fetch_failed<E: std::error::Error>(role: KeyRole, name: &str, err: E) -> LifecycleError {
    error!(%role, name, "failed to fetch key: {err}");
    LifecycleError::FetchFailed {
        role,
        name: name.to_string(),
        reason: err.to_string(),
    }
}

fn encoding_failed<E: std::error::Error>(role: KeyRole, name: &str, err: E) -> LifecycleError {
    error!(%role, name, "failed to encode key to PEM format: {err}");
    LifecycleError::EncodingFailed {
        role,
        name: name.to_string(),
        reason: err.to_string(),
    }
}
