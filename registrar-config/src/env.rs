// Environment variable loading

use crate::{ConfigError, Result};
use std::env;
use tracing::warn;

/// Environment variable loader
#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Resolve the full variable name for a key, applying the prefix
    pub fn full_key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = self.full_key(key);
        match env::var(&full_key) {
            Ok(value) => Ok(value),
            Err(env::VarError::NotPresent) => Err(ConfigError::KeyNotFound(full_key)),
            Err(e) => Err(ConfigError::EnvError(e)),
        }
    }

    /// Load a variable, treating unset and empty values alike.
    ///
    /// Values that are not valid UTF-8 are converted lossily instead of being
    /// dropped.
    pub fn optional(&self, key: &str) -> Option<String> {
        let full_key = self.full_key(key);
        let value = env::var_os(&full_key)?;
        let value = match value.into_string() {
            Ok(value) => value,
            Err(raw) => {
                warn!(key = %full_key, "Environment variable is not valid UTF-8");
                raw.to_string_lossy().into_owned()
            }
        };
        Some(value).filter(|value| !value.is_empty())
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Variables set here use names unique to their test.

    #[test]
    fn test_env_loader_with_default() {
        let loader = EnvLoader::new(None);
        let value = loader.load_var_or("NONEXISTENT_VAR_12345", "default");

        assert_eq!(value, "default");
    }

    #[test]
    fn test_env_loader_missing_var() {
        let loader = EnvLoader::new(Some("REGISTRAR_TEST".to_string()));
        let result = loader.load_var("MISSING_VAR_67890");

        assert!(matches!(
            result,
            Err(ConfigError::KeyNotFound(key)) if key == "REGISTRAR_TEST_MISSING_VAR_67890"
        ));
    }

    #[test]
    fn test_env_loader_optional_missing() {
        let loader = EnvLoader::default();
        assert_eq!(loader.optional("NONEXISTENT_VAR_54321"), None);
    }

    #[test]
    fn test_full_key_uppercases() {
        let loader = EnvLoader::new(Some("MY_APP".to_string()));
        assert_eq!(loader.full_key("consul_port"), "MY_APP_CONSUL_PORT");
        assert_eq!(EnvLoader::default().full_key("tags"), "TAGS");
    }

    #[cfg(unix)]
    #[test]
    fn test_optional_keeps_non_utf8_value() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let loader = EnvLoader::new(Some("REGCFG_NON_UTF8".to_string()));
        unsafe {
            env::set_var("REGCFG_NON_UTF8_TAGS", OsStr::from_bytes(b"s\xff1"));
        }

        let value = loader.optional("TAGS");
        let strict = loader.load_var("TAGS");

        unsafe {
            env::remove_var("REGCFG_NON_UTF8_TAGS");
        }

        assert_eq!(value.as_deref(), Some("s\u{FFFD}1"));
        assert!(matches!(
            strict,
            Err(ConfigError::EnvError(env::VarError::NotUnicode(_)))
        ));
    }

    #[test]
    fn test_env_loader_path_exists() {
        let loader = EnvLoader::new(None);
        let result = loader.load_var("PATH");

        if std::env::var("PATH").is_ok() {
            assert!(result.is_ok());
        }
    }
}
