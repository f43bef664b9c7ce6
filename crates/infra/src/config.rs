//! Store configuration.

use std::path::{Path, PathBuf};

pub const DEFAULT_USERS_FILE: &str = "users.json";
pub const DEFAULT_INVENTORY_FILE: &str = "inventory.json";

/// Where the two JSON documents live.
///
/// The binary always uses `StoreConfig::default()` (files in the working
/// directory); tests point it at a scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub users_file: PathBuf,
    pub inventory_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            users_file: PathBuf::from(DEFAULT_USERS_FILE),
            inventory_file: PathBuf::from(DEFAULT_INVENTORY_FILE),
        }
    }
}

impl StoreConfig {
    /// Default file names under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            users_file: dir.join(DEFAULT_USERS_FILE),
            inventory_file: dir.join(DEFAULT_INVENTORY_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_keeps_default_names() {
        let config = StoreConfig::in_dir("/tmp/shop");
        assert_eq!(config.users_file, PathBuf::from("/tmp/shop/users.json"));
        assert_eq!(config.inventory_file, PathBuf::from("/tmp/shop/inventory.json"));
        assert_eq!(StoreConfig::default().users_file, PathBuf::from("users.json"));
    }
}
