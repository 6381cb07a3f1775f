pub mod config;
pub mod parameter_store;

#[derive(thiserror::Error, Debug)]
pub enum SecretStoreError {
    /// The store client could not be set up.
    #[error("could not build the secret store client: `{0}`")]
    ClientBuilder(String),
    #[error("reading secret `{0}`: `{1}`")]
    Read(String, String),
    #[error("writing secret `{0}`: `{1}`")]
    Write(String, String),
    /// The secret exists but holds no value.
    #[error("secret `{0}` has no value")]
    MissingValue(String),
    #[error("no remote secret store configured to access `{0}`")]
    NotConfigured(String),
}

/// A synchronous store of named secrets.
pub trait SecretStore {
    /// Writes `value` under `name`, overwriting any existing value.
    fn put_secret(&self, name: &str, value: &str) -> Result<(), SecretStoreError>;

    /// Reads the current value stored under `name`.
    fn get_secret(&self, name: &str) -> Result<String, SecretStoreError>;
}

/// Store for operations that never reach a remote backend, such as local key generation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRemoteStore;

impl SecretStore for NoRemoteStore {
    fn put_secret(&self, name: &str, _value: &str) -> Result<(), SecretStoreError> {
        Err(SecretStoreError::NotConfigured(name.to_string()))
    }

    fn get_secret(&self, name: &str) -> Result<String, SecretStoreError> {
        Err(SecretStoreError::NotConfigured(name.to_string()))
    }
}
