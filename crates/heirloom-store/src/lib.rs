//! Persistent storage for Heirloom engine state.
//!
//! One pretty-printed JSON file holding the full [`EngineState`]. Loading a
//! missing file yields an empty state, so a fresh deployment needs no
//! initialization step.

use heirloom_engine::EngineState;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from state persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handle on the engine's state file.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load state from the file, or an empty state if it does not exist.
    pub fn load(&self) -> Result<EngineState, StoreError> {
        if !self.path.exists() {
            log::debug!("state file {} absent, starting empty", self.path.display());
            return Ok(EngineState::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        let state: EngineState = serde_json::from_str(&contents)?;
        Ok(state)
    }

    /// Save state to the file, creating parent directories as needed.
    pub fn save(&self, state: &EngineState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, contents)?;
        log::debug!(
            "saved {} owner account(s) to {}",
            state.accounts.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heirloom_engine::{AssetId, InheritanceEngine, MemoryLedger, Wallet};
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let file = StateFile::new(dir.path().join("missing.json"));
        let state = file.load().unwrap();
        assert!(state.accounts.is_empty());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let file = StateFile::new(dir.path().join("nested/deeper/state.json"));
        file.save(&EngineState::new()).unwrap();
        assert!(file.path().exists());
    }

    #[test]
    fn test_engine_state_survives_restart() {
        let dir = tempdir().unwrap();
        let file = StateFile::new(dir.path().join("state.json"));

        let owner = Wallet::new("owner");
        let heir = Wallet::new("h1");
        let asset = AssetId::new("usdc");

        // First process: set up and persist.
        let mut engine = InheritanceEngine::new(MemoryLedger::new());
        engine
            .setup_inheritance(&owner, 86_400, &[heir.clone()], &[100], &[asset.clone()], 1_000)
            .unwrap();
        file.save(engine.state()).unwrap();

        // Second process: resume and read the same picture back.
        let restored = InheritanceEngine::with_state(MemoryLedger::new(), file.load().unwrap());
        assert!(restored.config(&owner).is_some());
        assert_eq!(restored.config(&owner).unwrap().last_activity, 1_000);
        assert!(restored.is_heir(&owner, &heir));
        assert!(restored.is_asset_selected(&owner, &asset));
    }

    #[test]
    fn test_corrupt_file_reports_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let err = StateFile::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }
}
