use crate::crypto::{decrypt_data, encrypt_data, CryptoError};
use crate::types::Credentials;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("the settings file not found")]
    NotFound,
    #[error("settings io error: {0}")]
    Io(#[from] io::Error),
    #[error("settings crypto error: {0}")]
    Crypto(#[from] CryptoError),
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encrypted on-disk store for the single set of user credentials.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, credentials: &Credentials) -> Result<(), SettingsError> {
        let json = serde_json::to_vec(credentials)?;
        let encrypted = encrypt_data(&json)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, encrypted)?;
        info!("settings saved to {}", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<Credentials, SettingsError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SettingsError::NotFound)
            }
            Err(err) => return Err(err.into()),
        };
        let decrypted = decrypt_data(&raw)?;
        Ok(serde_json::from_slice(&decrypted)?)
    }

    /// Removes the settings file. Already logged out is fine.
    pub fn logout(&self) -> Result<(), SettingsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("settings removed from {}", self.path.display());
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("logout with no settings file present");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
