//! Atomic write configuration.

use std::ffi::{OsStr, OsString};

use serde::{Deserialize, Serialize};

/// Tuning for [`atomic_write_with_options`](crate::atomic_write_with_options).
///
/// Deserializable so embedding applications can carry it in their own
/// TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AtomicWriteOptions {
    /// Fsync the parent directory after the rename (Unix only).
    pub sync_dir: bool,
    /// Temp-file name prefix. Defaults to `.<target-file-name>.`.
    pub temp_prefix: Option<String>,
    /// Temp-file name suffix.
    pub temp_suffix: String,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self {
        Self {
            sync_dir: true,
            temp_prefix: None,
            temp_suffix: ".tmp".to_string(),
        }
    }
}

impl AtomicWriteOptions {
    /// Returns the temp-file prefix to use for a target named `file_name`.
    pub(crate) fn temp_prefix_for(&self, file_name: &OsStr) -> OsString {
        match &self.temp_prefix {
            Some(prefix) => OsString::from(prefix),
            None => {
                let mut prefix = OsString::from(".");
                prefix.push(file_name);
                prefix.push(".");
                prefix
            }
        }
    }
}
