//! Cookie session settings read from the environment.
//!
//! | Variable | Debug default | Release |
//! |---|---|---|
//! | `SESSION_KEY_FILE` | `/var/run/secrets/session_key`, else a temporary key | file of at least 64 bytes |
//! | `SESSION_COOKIE_SECURE` | `true` | required |
//! | `SESSION_SAMESITE` | `Lax` | required (`Strict`, `Lax`, `None`) |
//! | `SESSION_ALLOW_EPHEMERAL` | `false` | required, must be false |
//!
//! Debug builds log and fall back on a missing or malformed toggle; release
//! builds refuse to start.

use std::fmt;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// How strictly toggles are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Defaults with warnings.
    Debug,
    /// Every toggle explicit and valid.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    /// Fall back in debug builds, fail in release builds.
    fn tolerate<T: fmt::Debug>(
        self,
        error: SessionConfigError,
        fallback: T,
    ) -> Result<T, SessionConfigError> {
        match self {
            Self::Debug => {
                warn!(%error, ?fallback, "session setting defaulted");
                Ok(fallback)
            }
            Self::Release => Err(error),
        }
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    /// Signing and encryption key for the private cookie.
    pub key: Key,
    /// Whether the cookie carries `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for the cookie.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable holds an unsupported value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is too short.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` without a secure cookie.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate the session settings.
///
/// # Examples
///
/// ```rust
/// use hacktrack::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = read_flag(env, COOKIE_SECURE_ENV, mode, true)?;
    let same_site = read_same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = read_flag(env, ALLOW_EPHEMERAL_ENV, mode, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = read_key(env, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn read_flag<E: Env>(
    env: &E,
    name: &'static str,
    mode: BuildMode,
    fallback: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return mode.tolerate(SessionConfigError::MissingEnv { name }, fallback);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => mode.tolerate(
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
            fallback,
        ),
    }
}

fn read_same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        return mode.tolerate(
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            SameSite::Lax,
        );
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => mode.tolerate(SessionConfigError::InsecureSameSiteNone, SameSite::None),
        _ => mode.tolerate(
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
            SameSite::Lax,
        ),
    }
}

fn read_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using temporary session key");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };
    let length = bytes.len();
    if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[fixture]
    fn key_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&[b'k'; SESSION_KEY_MIN_LEN])
            .expect("write key");
        file
    }

    fn env_with(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn release_env(key_path: &str, overrides: &[(&str, &str)]) -> MockEnv {
        let mut vars = vec![
            (KEY_FILE_ENV, key_path),
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Strict"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ];
        for (name, value) in overrides {
            vars.retain(|(existing, _)| existing != name);
            vars.push((name, value));
        }
        env_with(&vars)
    }

    #[rstest]
    fn release_accepts_explicit_settings(key_file: NamedTempFile) {
        let path = key_file.path().to_string_lossy().into_owned();
        let settings = session_settings_from_env(&release_env(&path, &[]), BuildMode::Release)
            .expect("valid settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    #[case::missing_secure(COOKIE_SECURE_ENV)]
    #[case::missing_same_site(SAMESITE_ENV)]
    #[case::missing_ephemeral(ALLOW_EPHEMERAL_ENV)]
    fn release_requires_every_toggle(key_file: NamedTempFile, #[case] missing: &str) {
        let path = key_file.path().to_string_lossy().into_owned();
        let vars: Vec<(&str, &str)> = [
            (KEY_FILE_ENV, path.as_str()),
            (COOKIE_SECURE_ENV, "1"),
            (SAMESITE_ENV, "Lax"),
            (ALLOW_EPHEMERAL_ENV, "0"),
        ]
        .into_iter()
        .filter(|(name, _)| *name != missing)
        .collect();

        let err = session_settings_from_env(&env_with(&vars), BuildMode::Release)
            .err()
            .expect("missing toggle");
        assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
    }

    #[rstest]
    #[case::bad_bool(&[(COOKIE_SECURE_ENV, "maybe")])]
    #[case::bad_same_site(&[(SAMESITE_ENV, "Sometimes")])]
    #[case::insecure_none(&[(SAMESITE_ENV, "None"), (COOKIE_SECURE_ENV, "0")])]
    #[case::ephemeral(&[(ALLOW_EPHEMERAL_ENV, "1")])]
    fn release_rejects_unsafe_values(key_file: NamedTempFile, #[case] overrides: &[(&str, &str)]) {
        let path = key_file.path().to_string_lossy().into_owned();
        let result = session_settings_from_env(&release_env(&path, overrides), BuildMode::Release);
        assert!(result.is_err());
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"short").expect("write key");
        let path = file.path().to_string_lossy().into_owned();

        let err = session_settings_from_env(&release_env(&path, &[]), BuildMode::Release)
            .err()
            .expect("short key");
        assert!(matches!(err, SessionConfigError::KeyTooShort { length: 5, .. }));
    }

    #[rstest]
    fn release_requires_a_readable_key() {
        let err = session_settings_from_env(
            &release_env("/nonexistent/hacktrack/session_key", &[]),
            BuildMode::Release,
        )
        .err()
        .expect("missing key");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    fn debug_falls_back_to_safe_defaults() {
        let env = env_with(&[
            (KEY_FILE_ENV, "/nonexistent/hacktrack/session_key"),
            (SAMESITE_ENV, "bogus"),
        ]);
        let settings = session_settings_from_env(&env, BuildMode::Debug).expect("defaults");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    #[case("YES", Some(true))]
    #[case(" 0 ", Some(false))]
    #[case("on", None)]
    fn parses_boolean_toggles(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }
}
