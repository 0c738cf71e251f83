//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use gomarket_cart::CartStore;
use gomarket_storage::FileStore;

use crate::config::CliConfig;
use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["gomarket.toml", ".gomarket.toml", "gomarket.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(cwd, config_path, output)
    }

    /// Load context rooted at `cwd`.
    ///
    /// Without an explicit path the nearest config file up the tree is used.
    /// A config file that exists but does not parse is an error.
    pub fn load_from(cwd: PathBuf, config_path: Option<&str>, output: Output) -> Result<Self> {
        let config = match config_path {
            Some(path) => CliConfig::load(path)?,
            None => match Self::find_config(&cwd) {
                Some(path) => {
                    output.debug(&format!("Using config {}", path.display()));
                    let path = path
                        .to_str()
                        .with_context(|| format!("Config path is not UTF-8: {}", path.display()))?;
                    CliConfig::load(path)?
                }
                None => CliConfig::default(),
            },
        };

        Ok(Self { config, output, cwd })
    }

    /// Find the nearest config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .flat_map(|dir| CONFIG_NAMES.iter().map(move |name| dir.join(name)))
            .find(|path| path.is_file())
    }

    /// Resolved path of the store file.
    pub fn store_path(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.path)
    }

    /// Open the configured file store.
    pub fn open_store(&self) -> Arc<FileStore> {
        Arc::new(FileStore::open(self.store_path()))
    }

    /// Open the cart and load what was persisted.
    pub async fn open_cart(&self) -> Result<CartStore> {
        let store = self.open_store();
        self.output
            .debug(&format!("Using store {}", store.path().display()));

        CartStore::open(store, &self.config.cart)
            .await
            .with_context(|| format!("Failed to open cart at {}", self.store_path().display()))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
