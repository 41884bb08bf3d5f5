//! Error types for certificate provisioning.

use thiserror::Error;

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Errors that can occur while provisioning a key/certificate pair.
///
/// Every variant is terminal for the invocation; nothing is retried.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Target directory is missing or could not be inspected.
    #[error("directory lookup failed for {path}: {reason}")]
    DirectoryLookup {
        /// The directory that was checked
        path: String,
        /// Why the lookup failed
        reason: String,
    },

    /// RSA key pair generation or encoding failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Building or self-signing the certificate failed.
    #[error("certificate build failed: {0}")]
    CertificateBuild(#[from] rcgen::Error),

    /// Writing one of the output files failed.
    #[error("failed to write {file}: {source}")]
    Persistence {
        /// The file that could not be written
        file: String,
        /// Underlying IO error
        source: std::io::Error,
    },
}

impl ProvisionError {
    /// Shorthand for a [`ProvisionError::Persistence`] on `file`.
    pub(crate) fn persistence(file: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Persistence {
            file: file.as_ref().display().to_string(),
            source,
        }
    }
}
