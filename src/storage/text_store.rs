//! Line-oriented text file storage.
//!
//! One address per line, no header. Every operation goes back to the file;
//! nothing is cached between calls.

use crate::error::{StoreError, StoreResult};
use crate::storage::{AddressRepository, Listing, RemoveOutcome};
use crate::types::TargetAddress;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Address list backed by a flat text file.
#[derive(Debug, Clone)]
pub struct TextFileStore {
    path: PathBuf,
}

impl TextFileStore {
    /// Default file name, relative to the working directory.
    pub const DEFAULT_FILE: &'static str = "ip_addresses.txt";

    /// Create a store over the given file. The file is not touched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_all(&self, entries: &[String]) -> StoreResult<()> {
        let mut content = String::with_capacity(entries.iter().map(|e| e.len() + 1).sum());
        for entry in entries {
            content.push_str(entry);
            content.push('\n');
        }
        fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }
}

/// Whether the file has content whose last byte is not a newline.
fn ends_unterminated(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

impl Default for TextFileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}

impl AddressRepository for TextFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn list(&self) -> StoreResult<Listing> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "address list does not exist");
                return Ok(Listing::Absent);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Listing::Entries(entries))
    }

    fn append(&self, addr: &str) -> StoreResult<TargetAddress> {
        let target = TargetAddress::parse(addr)
            .map_err(|_| StoreError::InvalidAddress(addr.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let line = if ends_unterminated(&mut file).map_err(|e| self.io_error(e))? {
            format!("\n{}\n", target)
        } else {
            format!("{}\n", target)
        };
        file.write_all(line.as_bytes()).map_err(|e| self.io_error(e))?;

        info!(address = %target, path = %self.path.display(), "added address");
        Ok(target)
    }

    fn remove(&self, addr: &str) -> StoreResult<RemoveOutcome> {
        let mut entries = match self.list()? {
            Listing::Absent => return Ok(RemoveOutcome::StoreAbsent),
            Listing::Entries(entries) => entries,
        };

        let Some(index) = entries.iter().position(|entry| entry == addr) else {
            return Ok(RemoveOutcome::NotPresent);
        };

        entries.remove(index);
        self.write_all(&entries)?;

        info!(address = addr, remaining = entries.len(), "removed address");
        Ok(RemoveOutcome::Removed)
    }

    fn clear(&self) -> StoreResult<()> {
        fs::write(&self.path, b"").map_err(|e| self.io_error(e))?;
        info!(path = %self.path.display(), "cleared address list");
        Ok(())
    }
}
