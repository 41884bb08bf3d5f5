//! # certgen
//!
//! Self-signed TLS key/certificate provisioning for the RemoteNote
//! KOReader plugin server.
//!
//! The server speaks TLS to the plugin over the loopback interface and
//! needs a local key/certificate pair before its first start. This crate
//! performs the one-shot check-then-generate-then-persist sequence:
//!
//! ```rust,ignore
//! use certgen::{provision, CertConfig, Outcome};
//!
//! match provision(std::path::Path::new("."), &CertConfig::default())? {
//!     Outcome::AlreadyProvisioned => println!("nothing to do"),
//!     Outcome::Generated(summary) => println!("new cert {}", summary.fingerprint),
//! }
//! ```
//!
//! The key is RSA-2048 and the private key is armored as PKCS#1
//! (`RSA PRIVATE KEY`) because the OpenSSL/LuaSec build bundled with
//! KOReader does not consistently support Ed25519 or PKCS#8.
//!
//! Provisioning is idempotent: when both `key.pem` and `cert.pem` exist
//! under the target directory, the run is a no-op. There is no rotation,
//! revocation or repair of partial state.

mod config;
mod error;
mod provision;

pub use config::CertConfig;
pub use error::{ProvisionError, Result};
pub use provision::{
    already_provisioned, provision, CertificateSummary, Outcome, CERT_FILE_NAME, KEY_FILE_NAME,
};
