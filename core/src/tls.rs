//! TLS verification policy for the adapter's transport.
//!
//! # Design
//! Verification can be on, off, or anchored to a custom CA bundle on disk.
//! Turning it off never touches process-wide state: the adapter owning the
//! policy logs a single warning when it is constructed, and the policy's
//! `suppress_insecure_warnings` silences that warning for that adapter only.

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How server certificates are verified.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TlsVerify {
    /// Verify against the platform/webpki trust roots.
    #[default]
    Enabled,
    /// Accept any certificate.
    Disabled,
    /// Verify against the PEM bundle at this path only.
    CustomCa(PathBuf),
}

impl FromStr for TlsVerify {
    type Err = Infallible;

    /// `true`/`false` style values toggle verification; anything else is
    /// taken as a path to a CA bundle.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "" | "true" | "1" | "yes" | "on" => Self::Enabled,
            "false" | "0" | "no" | "off" => Self::Disabled,
            _ => Self::CustomCa(PathBuf::from(s.trim())),
        })
    }
}

impl From<bool> for TlsVerify {
    fn from(verify: bool) -> Self {
        if verify {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl From<PathBuf> for TlsVerify {
    fn from(path: PathBuf) -> Self {
        Self::CustomCa(path)
    }
}

impl From<&Path> for TlsVerify {
    fn from(path: &Path) -> Self {
        Self::CustomCa(path.to_path_buf())
    }
}

/// TLS settings owned by one adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPolicy {
    verify: TlsVerify,
    insecure_warnings: bool,
}

impl Default for TlsPolicy {
    fn default() -> Self {
        Self::new(TlsVerify::Enabled)
    }
}

impl TlsPolicy {
    pub fn new(verify: impl Into<TlsVerify>) -> Self {
        Self {
            verify: verify.into(),
            insecure_warnings: true,
        }
    }

    /// Policy that accepts any server certificate.
    pub fn insecure() -> Self {
        Self::new(TlsVerify::Disabled)
    }

    /// Silence the insecure-connection warning for adapters using this policy.
    ///
    /// Has no effect unless verification is disabled, and never affects other
    /// adapters or HTTP clients in the process.
    #[must_use]
    pub fn suppress_insecure_warnings(mut self) -> Self {
        self.insecure_warnings = false;
        self
    }

    pub fn verify(&self) -> &TlsVerify {
        &self.verify
    }

    pub fn is_insecure(&self) -> bool {
        self.verify == TlsVerify::Disabled
    }

    /// Whether an adapter built with this policy should warn about it.
    pub fn warns_insecure(&self) -> bool {
        self.is_insecure() && self.insecure_warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_booleans_and_paths() {
        assert_eq!("true".parse::<TlsVerify>().unwrap(), TlsVerify::Enabled);
        assert_eq!("FALSE".parse::<TlsVerify>().unwrap(), TlsVerify::Disabled);
        assert_eq!("0".parse::<TlsVerify>().unwrap(), TlsVerify::Disabled);
        assert_eq!(
            "/etc/ssl/graylog-ca.pem".parse::<TlsVerify>().unwrap(),
            TlsVerify::CustomCa(PathBuf::from("/etc/ssl/graylog-ca.pem"))
        );
    }

    #[test]
    fn insecure_policy_warns_until_suppressed() {
        let policy = TlsPolicy::insecure();
        assert!(policy.warns_insecure());
        assert!(!policy.suppress_insecure_warnings().warns_insecure());
    }

    #[test]
    fn secure_policies_never_warn() {
        assert!(!TlsPolicy::default().warns_insecure());
        assert!(!TlsPolicy::new(PathBuf::from("ca.pem")).warns_insecure());
    }
}
