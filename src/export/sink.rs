//! Local save targets for exported artifacts and downloaded images.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Somewhere a named file can be saved.
///
/// `save` blocks. Async callers run it on a blocking pool.
pub trait FileSink: Send + Sync {
    /// Save `bytes` under `filename`, returning where it went.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves files into a directory on disk, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink for `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let save_error = |e: std::io::Error| Error::Save {
            filename: filename.to_string(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.dir).map_err(save_error)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes).map_err(save_error)?;

        log::debug!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Keeps saved files in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything saved so far, in save order.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_default()
    }

    /// Contents of the most recent file saved under `filename`.
    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.files().into_iter().rev().find_map(|(name, bytes)| {
            if name == filename {
                Some(bytes)
            } else {
                None
            }
        })
    }

    /// Number of saves.
    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    /// Check if nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileSink for MemorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let mut files = self.files.lock().map_err(|_| Error::Save {
            filename: filename.to_string(),
            reason: "memory sink poisoned".to_string(),
        })?;
        files.push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_creates_dir() {
        let temp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(temp.path().join("out"));

        let path = sink.save("report.csv", b"a,b\n").unwrap();
        assert_eq!(path, temp.path().join("out").join("report.csv"));
        assert_eq!(fs::read(&path).unwrap(), b"a,b\n");
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.save("a.png", &[1, 2]).unwrap();
        sink.save("a.png", &[3]).unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get("a.png"), Some(vec![3]));
        assert_eq!(sink.get("missing"), None);
    }
}
