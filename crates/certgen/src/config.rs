//! Certificate identity and validity configuration.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Identity and validity constants for the generated certificate.
///
/// The defaults describe the RemoteNote KOReader server identity and are
/// what the `certgen` binary uses. The struct exists so the values can be
/// overridden in one place (e.g. a shorter validity window in tests)
/// without touching the provisioning logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertConfig {
    /// Subject common name (default: "RemoteNote KOReader Server").
    #[serde(default = "default_common_name")]
    pub common_name: String,

    /// Subject alternative DNS names (default: localhost, remotenote.koplugin).
    #[serde(default = "default_dns_names")]
    pub dns_names: Vec<String>,

    /// Subject alternative IP addresses (default: 127.0.0.1, 0.0.0.0).
    ///
    /// Loopback and all-interfaces only; the certificate is not meant to
    /// cover remote hostnames.
    #[serde(default = "default_ip_addresses")]
    pub ip_addresses: Vec<IpAddr>,

    /// Validity window in days (default: 3650).
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,

    /// Certificate serial number (default: 1).
    ///
    /// A constant serial is fine here: single issuer, never part of a PKI.
    #[serde(default = "default_serial")]
    pub serial: u64,

    /// RSA modulus size in bits (default: 2048).
    #[serde(default = "default_key_bits")]
    pub key_bits: usize,
}

impl Default for CertConfig {
    fn default() -> Self {
        Self {
            common_name: default_common_name(),
            dns_names: default_dns_names(),
            ip_addresses: default_ip_addresses(),
            validity_days: default_validity_days(),
            serial: default_serial(),
            key_bits: default_key_bits(),
        }
    }
}

// Default value functions for serde.
fn default_common_name() -> String {
    String::from("RemoteNote KOReader Server")
}

fn default_dns_names() -> Vec<String> {
    vec![
        String::from("localhost"),
        String::from("remotenote.koplugin"),
    ]
}

fn default_ip_addresses() -> Vec<IpAddr> {
    vec![
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    ]
}

const fn default_validity_days() -> u32 {
    3650
}

const fn default_serial() -> u64 {
    1
}

const fn default_key_bits() -> usize {
    2048
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CertConfig::default();
        assert_eq!(config.common_name, "RemoteNote KOReader Server");
        assert_eq!(config.dns_names, vec!["localhost", "remotenote.koplugin"]);
        assert_eq!(
            config.ip_addresses,
            vec![
                IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
                IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            ]
        );
        assert_eq!(config.validity_days, 3650);
        assert_eq!(config.serial, 1);
        assert_eq!(config.key_bits, 2048);
    }

    #[test]
    fn test_config_serialization() {
        let config = CertConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: CertConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.common_name, config.common_name);
        assert_eq!(parsed.dns_names, config.dns_names);
        assert_eq!(parsed.validity_days, config.validity_days);
        assert_eq!(parsed.serial, config.serial);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let parsed: CertConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.common_name, "RemoteNote KOReader Server");
        assert_eq!(parsed.key_bits, 2048);
    }
}
