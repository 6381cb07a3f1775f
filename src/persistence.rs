use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::naming::KeyRole;

/// File mode for public key files: owner read/write, group/other read.
pub const PUBLIC_KEY_FILE_MODE: u32 = 0o644;
/// File mode for private key files: owner read/write only.
pub const PRIVATE_KEY_FILE_MODE: u32 = 0o600;

/// Errors that can occur while persisting key material locally.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Error that occurs when the output directory is invalid.
    #[error("invalid path: `{0}`")]
    InvalidPath(String),
    /// Error that occurs when the file name is empty or contains a path separator.
    #[error("invalid file name: `{0}`")]
    InvalidFileName(String),
    #[error("unable to create key file: `{0}`")]
    UnableToCreateKeyFile(String),
    #[error("unable to write key: `{0}`")]
    UnableToWriteKey(String),
}

/// Writes encoded key material somewhere the operator can pick it up.
pub trait PersistenceGateway {
    /// Writes `data` into `file_name` and returns the path that was written.
    fn write_file(
        &self,
        file_name: &str,
        role: KeyRole,
        data: &[u8],
    ) -> Result<PathBuf, PersistenceError>;
}

/// Writes key files into a local directory, replacing existing files.
#[derive(Debug)]
pub struct LocalFileWriter {
    /// The directory where the key files will be stored.
    path: PathBuf,
}

impl TryFrom<PathBuf> for LocalFileWriter {
    type Error = PersistenceError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        if !value.exists() {
            return Err(PersistenceError::InvalidPath(String::from(
                "output path does not exist",
            )));
        }
        if value.is_file() {
            return Err(PersistenceError::InvalidPath(String::from(
                "output path needs to be a directory",
            )));
        }
        Ok(LocalFileWriter { path: value })
    }
}

impl PersistenceGateway for LocalFileWriter {
    fn write_file(
        &self,
        file_name: &str,
        role: KeyRole,
        data: &[u8],
    ) -> Result<PathBuf, PersistenceError> {
        if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') {
            return Err(PersistenceError::InvalidFileName(file_name.to_string()));
        }
        let path = self.path.join(file_name);
        let mut file = create_key_file(&path, file_mode(role))
            .map_err(|e| PersistenceError::UnableToCreateKeyFile(e.to_string()))?;
        file.write_all(data)
            .map_err(|e| PersistenceError::UnableToWriteKey(e.to_string()))?;
        debug!(path = %path.display(), %role, "key file written");
        Ok(path)
    }
}

fn file_mode(role: KeyRole) -> u32 {
    match role {
        KeyRole::Public => PUBLIC_KEY_FILE_MODE,
        KeyRole::Private => PRIVATE_KEY_FILE_MODE,
    }
}

#[cfg(unix)]
fn create_key_file(path: &Path, mode: u32) -> std::io::Result<File> {
    use std::fs::Permissions;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)?;
    // The mode above only applies to newly created files.
    file.set_permissions(Permissions::from_mode(mode))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_key_file(path: &Path, _mode: u32) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
