use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::key_size::KeySize;
use crate::naming::ArtifactNames;

/// The lifecycle operation a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Generate,
    Store,
    Fetch,
}

/// Local files written by an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalFiles {
    pub public: PathBuf,
    pub private: PathBuf,
}

/// Summary of a successful lifecycle operation. Final output of the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyPairReport {
    pub operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_size: Option<KeySize>,
    /// Artifact names of the key pair, which are also the remote parameter names.
    pub names: ArtifactNames,
    pub files: LocalFiles,
}

impl fmt::Display for KeyPairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.operation, self.key_size) {
            (Operation::Generate, Some(size)) => {
                writeln!(f, "Generated {size} bit RSA key pair with names:")?
            }
            (Operation::Generate, None) => writeln!(f, "Generated RSA key pair with names:")?,
            (Operation::Store, _) => writeln!(f, "Generated and stored keys:")?,
            (Operation::Fetch, _) => writeln!(f, "Downloaded RSA key pair with names:")?,
        }
        writeln!(f)?;
        writeln!(
            f,
            "   Public Key: {} ({})",
            self.names.public,
            self.files.public.display()
        )?;
        write!(
            f,
            "   Private Key: {} ({})",
            self.names.private,
            self.files.private.display()
        )
    }
}
