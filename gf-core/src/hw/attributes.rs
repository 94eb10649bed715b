//! Attribute file access
//!
//! The kernel exposes hwmon sensors and actuators as small text files. The
//! rest of the crate reaches them only through [`AttributeStore`], so the
//! controller can be driven against a temporary directory or an in-memory
//! fake in tests.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use gf_error::{GpufanError, Result};
use tracing::trace;

/// Narrow view of a sysfs-like attribute tree
#[cfg_attr(test, mockall::automock)]
pub trait AttributeStore {
    /// Expand a glob pattern into existing paths, in sorted order
    fn matching(&self, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Read an attribute, with the trailing newline stripped
    fn read(&self, path: &Path) -> Result<String>;

    /// Write an integer attribute
    fn write(&self, path: &Path, value: u64) -> Result<()>;
}

/// Read an attribute and parse it as an unsigned integer
pub fn read_unsigned<S: AttributeStore + ?Sized>(store: &S, path: &Path) -> Result<u64> {
    let raw = store.read(path)?;
    raw.parse::<u64>()
        .map_err(|e| GpufanError::invalid_value(path, raw.as_str(), e))
}

/// Glob pattern for files matching `mask` directly inside `dir`
///
/// The directory part is escaped so only the mask is interpreted.
pub fn pattern_in(dir: &Path, mask: &str) -> String {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    format!("{}/{}", escaped.trim_end_matches('/'), mask)
}

/// Real attribute store backed by the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct SysfsStore;

impl SysfsStore {
    pub fn new() -> Self {
        Self
    }
}

impl AttributeStore for SysfsStore {
    fn matching(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let entries = glob::glob(pattern).map_err(|e| GpufanError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| GpufanError::FileRead {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            paths.push(path);
        }

        trace!(pattern, count = paths.len(), "Expanded attribute pattern");
        Ok(paths)
    }

    fn read(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).map_err(|source| GpufanError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(content.trim_end_matches('\n').to_string())
    }

    fn write(&self, path: &Path, value: u64) -> Result<()> {
        // Attributes are created by the driver; never create one ourselves.
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|source| GpufanError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;

        file.write_all(format!("{}\n", value).as_bytes())
            .map_err(|source| GpufanError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;

        trace!(path = %path.display(), value, "Wrote attribute");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_strips_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("name");
        fs::write(&path, "amdgpu\n").unwrap();

        assert_eq!(SysfsStore::new().read(&path).unwrap(), "amdgpu");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = SysfsStore::new().read(&dir.path().join("name")).unwrap_err();
        assert!(matches!(err, GpufanError::FileRead { .. }));
    }

    #[test]
    fn test_write_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pwm1");
        fs::write(&path, "127\n").unwrap();

        SysfsStore::new().write(&path, 0).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0\n");
    }

    #[test]
    fn test_write_never_creates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pwm1");

        let err = SysfsStore::new().write(&path, 64).unwrap_err();
        assert!(matches!(err, GpufanError::FileWrite { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_matching_single_char_wildcard() {
        let dir = TempDir::new().unwrap();
        for name in ["pwm1", "pwm1_enable", "pwm2", "pwm10", "fan1_input"] {
            fs::write(dir.path().join(name), "0\n").unwrap();
        }

        let store = SysfsStore::new();
        let pwms = store.matching(&pattern_in(dir.path(), "pwm?")).unwrap();
        assert_eq!(pwms, vec![dir.path().join("pwm1"), dir.path().join("pwm2")]);

        let enables = store.matching(&pattern_in(dir.path(), "pwm?_enable")).unwrap();
        assert_eq!(enables, vec![dir.path().join("pwm1_enable")]);
    }

    #[test]
    fn test_matching_invalid_pattern() {
        let err = SysfsStore::new().matching("/sys/class/hwmon/[").unwrap_err();
        assert!(matches!(err, GpufanError::InvalidPattern { .. }));
    }

    #[test]
    fn test_pattern_in_escapes_directory() {
        assert_eq!(pattern_in(Path::new("/tmp/a[1]"), "pwm?"), "/tmp/a[[]1[]]/pwm?");
        assert_eq!(pattern_in(Path::new("/sys/class/hwmon/hwmon0/"), "pwm?"), "/sys/class/hwmon/hwmon0/pwm?");
    }

    #[test]
    fn test_read_unsigned() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("temp2_input");
        let bad = dir.path().join("temp3_input");
        fs::write(&good, "71000\n").unwrap();
        fs::write(&bad, "-5000\n").unwrap();

        let store = SysfsStore::new();
        assert_eq!(read_unsigned(&store, &good).unwrap(), 71000);
        let err = read_unsigned(&store, &bad).unwrap_err();
        assert!(matches!(err, GpufanError::InvalidValue { ref value, .. } if value == "-5000"));
    }
}
