use std::path::{Path, PathBuf};

use ini::Ini;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Path of the credentials file used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "1557.ini";

const SECTION: &str = "1557";
const PHONE_KEY: &str = "phone";
const PASSWORD_KEY: &str = "pass";

/// Errors that can occur while loading credentials
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
    #[error("missing section [{section}] in {path}")]
    MissingSection { path: PathBuf, section: &'static str },
    #[error("missing key `{key}` in section [{section}] of {path}")]
    MissingKey {
        path: PathBuf,
        section: &'static str,
        key: &'static str,
    },
}

/// Portal login credentials
///
/// Read from the `[1557]` section of an INI file:
///
/// ```ini
/// [1557]
/// phone = 0501234567
/// pass = secret
/// ```
#[derive(Debug)]
pub struct Credentials {
    pub phone: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(phone: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Loads credentials from the INI file at `path`
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or parsed, or if the `[1557]` section or either of
    /// the `phone` and `pass` keys is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Load {
            path: path.to_owned(),
            source,
        })?;

        let section = ini
            .section(Some(SECTION))
            .ok_or_else(|| ConfigError::MissingSection {
                path: path.to_owned(),
                section: SECTION,
            })?;

        let value = |key: &'static str| {
            section.get(key).ok_or_else(|| ConfigError::MissingKey {
                path: path.to_owned(),
                section: SECTION,
                key,
            })
        };

        Ok(Self::new(value(PHONE_KEY)?, value(PASSWORD_KEY)?))
    }

    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
