use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::CliError;

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let data = serde_json::to_vec_pretty(value)?;
    write_bytes_atomic(path, &data)
}

/// Replace `path` with `data` so readers see either the old file or the new
/// one, never a partial write.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), CliError> {
    let staged = StagedFile::create(path)?;
    staged.commit(data)
}

/// A sibling temp file that is renamed over its target on commit and removed
/// when dropped uncommitted.
struct StagedFile {
    target: PathBuf,
    temp: PathBuf,
    dir: Option<PathBuf>,
    committed: bool,
}

impl StagedFile {
    fn create(target: &Path) -> Result<Self, CliError> {
        let name = target.file_name().ok_or_else(|| {
            CliError::InvalidConfig(format!("invalid output path '{}'", target.display()))
        })?;
        let dir = target
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
        if let Some(dir) = &dir {
            fs::create_dir_all(dir)?;
        }

        let temp = target.with_file_name(format!(
            ".{}.{}.tmp",
            name.to_string_lossy(),
            std::process::id()
        ));
        Ok(Self {
            target: target.to_path_buf(),
            temp,
            dir,
            committed: false,
        })
    }

    fn commit(mut self, data: &[u8]) -> Result<(), CliError> {
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&self.temp)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp, &self.target)?;
        self.committed = true;
        if let Some(dir) = &self.dir {
            File::open(dir)?.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp);
        }
    }
}
