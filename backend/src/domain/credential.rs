//! One-time temporary credentials issued on approval.
//!
//! Format: `HT-` followed by eight alphanumerics from the OS CSPRNG and a
//! trailing `!`. The plaintext is shown once to the approving admin and is
//! zeroed when dropped.

use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// Prefix of every temporary credential.
pub const CREDENTIAL_PREFIX: &str = "HT-";
/// Suffix of every temporary credential.
pub const CREDENTIAL_SUFFIX: char = '!';
/// Number of random characters between prefix and suffix.
pub const CREDENTIAL_RANDOM_LEN: usize = 8;

/// Plaintext temporary password.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryCredential(Zeroizing<String>);

impl TemporaryCredential {
    /// Build a credential around `random`, which must be alphanumeric and
    /// exactly [`CREDENTIAL_RANDOM_LEN`] characters long.
    ///
    /// # Examples
    /// ```
    /// use hacktrack::domain::TemporaryCredential;
    ///
    /// let credential = TemporaryCredential::from_random_part("abcd1234").unwrap();
    /// assert_eq!(credential.expose(), "HT-abcd1234!");
    /// assert!(TemporaryCredential::from_random_part("short").is_none());
    /// ```
    #[must_use]
    pub fn from_random_part(random: &str) -> Option<Self> {
        let valid = random.chars().count() == CREDENTIAL_RANDOM_LEN
            && random.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| {
            Self(Zeroizing::new(format!(
                "{CREDENTIAL_PREFIX}{random}{CREDENTIAL_SUFFIX}"
            )))
        })
    }

    /// Reveal the plaintext. Callers must not log it.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for TemporaryCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TemporaryCredential(***)")
    }
}

/// Source of temporary credentials.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialGenerator: Send + Sync {
    /// Produce a fresh credential.
    fn generate(&self) -> TemporaryCredential;
}

/// Generator backed by the operating system's CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsCredentialGenerator;

impl CredentialGenerator for OsCredentialGenerator {
    fn generate(&self) -> TemporaryCredential {
        let random: Zeroizing<String> = Zeroizing::new(
            OsRng
                .sample_iter(&Alphanumeric)
                .take(CREDENTIAL_RANDOM_LEN)
                .map(char::from)
                .collect(),
        );
        TemporaryCredential(Zeroizing::new(format!(
            "{CREDENTIAL_PREFIX}{}{CREDENTIAL_SUFFIX}",
            random.as_str()
        )))
    }
}
