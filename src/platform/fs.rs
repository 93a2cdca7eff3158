// DexTracker - platform/fs.rs
//
// Filesystem helpers shared by the app layer: lossy text reads and atomic
// writes (write temp file, rename over target).

use std::io;
use std::path::{Path, PathBuf};

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion so a stray byte in a
/// hand-edited log never makes the whole file unreadable.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Sibling temp path used by [`write_atomic`].
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` to `path` atomically, creating parent directories.
///
/// A crash between write and rename loses the new content but never
/// corrupts the previous file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path_for(path);
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        // Clean up the temp file on failure; ignore any secondary error.
        let _ = std::fs::remove_file(&tmp);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_file_lossy_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.log");
        std::fs::write(&path, b"NUM|NAME\n1|Caf\xe9\n").unwrap();
        let content = read_file_lossy(&path).unwrap();
        assert!(content.contains("Caf\u{FFFD}"));
    }

    #[test]
    fn test_read_file_lossy_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let err = read_file_lossy(&dir.path().join("nope.log")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_write_atomic_creates_parents_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_temp_path_keeps_extension() {
        let tmp = temp_path_for(Path::new("/data/history.json"));
        assert_eq!(tmp, PathBuf::from("/data/history.json.tmp"));
    }
}
