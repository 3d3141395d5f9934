//! File persistence for credential records.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::CryptError;
use crate::record::CredentialRecord;
use crate::salt::{OsRandom, RandomSource};

/// A JSON file holding a single [`CredentialRecord`].
#[derive(Debug, Clone)]
pub struct RecordFile {
    path: PathBuf,
}

impl RecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a valid
    /// record.
    pub fn load(&self) -> Result<CredentialRecord, CryptError> {
        let data = fs::read_to_string(&self.path)?;
        CredentialRecord::from_json(&data)
    }

    /// Writes the record through a temporary file and an atomic rename, so a
    /// crash leaves either the old or the new record on disk.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, record: &CredentialRecord) -> Result<(), CryptError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = record.to_json()?;
        let tmp_path = self.random_tmp_path()?;

        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.write_all(b"\n")?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        self.sync_parent()?;
        Ok(())
    }

    #[cfg(unix)]
    fn sync_parent(&self) -> std::io::Result<()> {
        match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => fs::File::open(parent)?.sync_all(),
            None => Ok(()),
        }
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> std::io::Result<()> {
        Ok(())
    }

    /// `<file name>.tmp.<16 hex digits>` next to the target.
    fn random_tmp_path(&self) -> Result<PathBuf, CryptError> {
        let mut buf = [0u8; 8];
        OsRandom.fill(&mut buf)?;

        let suffix: String = buf.iter().map(|b| format!("{b:02x}")).collect();
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "record".to_string());

        Ok(self.path.with_file_name(format!("{file_name}.tmp.{suffix}")))
    }
}
