use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::Result;

pub const RECORD_EXTENSION: &str = "json";

#[derive(Clone, Debug)]
pub struct LedgerConfig {
    pub state_dir: PathBuf,
}

impl LedgerConfig {
    pub fn new(state_dir: PathBuf) -> Self {
        Self { state_dir }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{key}.{RECORD_EXTENSION}"))
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        if !self.state_dir.exists() {
            fs::create_dir_all(&self.state_dir)?;
        }
        Ok(())
    }
}
