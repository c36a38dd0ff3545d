// medallion-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes `content` to `path` through a temporary sibling file and a rename,
/// so readers never observe a half-written file. Missing parent directories
/// are created.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Pretty JSON variant of [`atomic_write`].
pub fn write_json<P: AsRef<Path>, T: Serialize>(
    path: P,
    data: &T,
) -> Result<(), InfrastructureError> {
    let content = serde_json::to_string_pretty(data)?;
    atomic_write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parents() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("target").join("run_results.json");

        atomic_write(&file_path, "{}")?;

        assert_eq!(fs::read_to_string(file_path)?, "{}");
        Ok(())
    }

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("report.json");

        atomic_write(&file_path, "old")?;
        atomic_write(&file_path, "new")?;

        assert_eq!(fs::read_to_string(file_path)?, "new");
        // No temporary file left behind
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_write_json_pretty_prints() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("data.json");

        write_json(&file_path, &serde_json::json!({ "rows": 3 }))?;

        let content = fs::read_to_string(file_path)?;
        assert!(content.contains("\"rows\": 3"));
        Ok(())
    }
}
