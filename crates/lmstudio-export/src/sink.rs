//! Output sinks for serialized documents.

use std::path::Path;

use crate::error::{ExportError, Result};

/// Persists serialized bytes at a path.
pub trait ConfigSink: Send + Sync {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Writes to the local filesystem, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl ConfigSink for FsSink {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let io_err = |source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, bytes).map_err(io_err)?;
        tracing::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a").join("b").join("out.json");
        FsSink.write(&path, b"{}").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "{}");
    }

    #[test]
    fn write_error_carries_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").expect("write blocker");
        let path = blocker.join("nested.json");
        let err = FsSink.write(&path, b"{}").expect_err("should fail");
        match err {
            ExportError::Write { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
