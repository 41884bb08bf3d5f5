//! The check-then-generate-then-persist provisioning sequence.

use std::fs;
use std::io::Write;
use std::path::Path;

use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
    KeyUsagePurpose, SanType,
};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::config::CertConfig;
use crate::error::{ProvisionError, Result};

/// Private key file name in the target directory.
pub const KEY_FILE_NAME: &str = "key.pem";

/// Certificate file name in the target directory.
pub const CERT_FILE_NAME: &str = "cert.pem";

/// key.pem is secret material: owner read/write only.
const KEY_MODE: u32 = 0o600;

/// cert.pem is public material: group/world readable.
const CERT_MODE: u32 = 0o644;

/// Result of a provisioning run.
#[derive(Debug)]
pub enum Outcome {
    /// Both files were already present; nothing was written.
    AlreadyProvisioned,

    /// A fresh key/certificate pair was generated and persisted.
    Generated(CertificateSummary),
}

/// Metadata of a freshly generated certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateSummary {
    /// Serial number (hex)
    pub serial: String,

    /// Subject common name
    pub subject: String,

    /// Not valid before
    #[serde(with = "time::serde::rfc3339")]
    pub not_before: OffsetDateTime,

    /// Not valid after
    #[serde(with = "time::serde::rfc3339")]
    pub not_after: OffsetDateTime,

    /// SHA-256 of the certificate DER (hex)
    pub fingerprint: String,
}

/// Check whether both output files are already present under `dir`.
pub fn already_provisioned(dir: &Path) -> bool {
    dir.join(KEY_FILE_NAME).exists() && dir.join(CERT_FILE_NAME).exists()
}

/// Provision `key.pem` and `cert.pem` under `dir`.
///
/// Returns [`Outcome::AlreadyProvisioned`] without touching the filesystem
/// when both files exist, making repeated runs no-ops. One file present
/// without the other is not detected or repaired; generation proceeds and
/// overwrites the survivor.
///
/// The certificate is written before the key and the two writes are not
/// atomic: a failed key write leaves the certificate behind on disk.
pub fn provision(dir: &Path, config: &CertConfig) -> Result<Outcome> {
    let meta = fs::metadata(dir).map_err(|e| ProvisionError::DirectoryLookup {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;
    if !meta.is_dir() {
        return Err(ProvisionError::DirectoryLookup {
            path: dir.display().to_string(),
            reason: String::from("not a directory"),
        });
    }

    if already_provisioned(dir) {
        debug!(dir = %dir.display(), "key and certificate already present, skipping");
        return Ok(Outcome::AlreadyProvisioned);
    }

    debug!(bits = config.key_bits, "generating RSA key pair");
    let private_key = generate_rsa_key(config.key_bits)?;

    let (cert_pem, summary) = build_certificate(&private_key, config)?;

    // PKCS#1 armor ("RSA PRIVATE KEY"), kept in a zeroizing buffer.
    let key_pem = private_key
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| ProvisionError::KeyGeneration(e.to_string()))?;

    let cert_path = dir.join(CERT_FILE_NAME);
    let key_path = dir.join(KEY_FILE_NAME);

    write_with_mode(&cert_path, cert_pem.as_bytes(), CERT_MODE)
        .map_err(|e| ProvisionError::persistence(&cert_path, e))?;
    write_with_mode(&key_path, key_pem.as_bytes(), KEY_MODE)
        .map_err(|e| ProvisionError::persistence(&key_path, e))?;

    debug!(fingerprint = %summary.fingerprint, "wrote key and certificate");
    Ok(Outcome::Generated(summary))
}

/// Generate a fresh RSA private key from the OS CSPRNG.
fn generate_rsa_key(bits: usize) -> Result<RsaPrivateKey> {
    let mut rng = rand::rngs::OsRng;
    RsaPrivateKey::new(&mut rng, bits).map_err(|e| ProvisionError::KeyGeneration(e.to_string()))
}

/// Build and self-sign the certificate, returning its PEM and summary.
fn build_certificate(
    private_key: &RsaPrivateKey,
    config: &CertConfig,
) -> Result<(String, CertificateSummary)> {
    // rcgen cannot generate RSA keys itself; import ours via PKCS#8.
    let pkcs8_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| ProvisionError::KeyGeneration(e.to_string()))?;
    let key_pair = KeyPair::from_pem(&pkcs8_pem)?;

    let mut params = CertificateParams::new(config.dns_names.clone())?;
    for ip in &config.ip_addresses {
        params.subject_alt_names.push(SanType::IpAddress(*ip));
    }

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, config.common_name.as_str());
    params.distinguished_name = dn;

    // End-entity cert usable for both sides of the loopback connection.
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];
    params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ServerAuth,
        ExtendedKeyUsagePurpose::ClientAuth,
    ];

    let not_before = OffsetDateTime::now_utc();
    let not_after = not_before + Duration::days(i64::from(config.validity_days));
    params.not_before = not_before;
    params.not_after = not_after;
    params.serial_number = Some(config.serial.into());

    let cert = params.self_signed(&key_pair)?;

    let summary = CertificateSummary {
        serial: format!("{:016x}", config.serial),
        subject: config.common_name.clone(),
        not_before,
        not_after,
        fingerprint: sha256_hex(cert.der().as_ref()),
    };

    Ok((cert.pem(), summary))
}

/// Hex-encoded SHA-256 digest.
fn sha256_hex(bytes: &[u8]) -> String {
    let digest = ring::digest::digest(&ring::digest::SHA256, bytes);
    hex::encode(digest)
}

/// Write `bytes` to `path`, created with `mode`.
///
/// The mode is applied again after the write so the contract holds under
/// any umask.
fn write_with_mode(path: &Path, bytes: &[u8], mode: u32) -> std::io::Result<()> {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(mode);
    }

    let mut file = opts.open(path)?;
    file.write_all(bytes)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}
