use anyhow::{Context, Result};
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::debug;

/// Mode for a freshly created output file; it is served to browsers.
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

/// Replace `path` with `contents`.
///
/// Writes to a temp file next to the target, then renames it over the
/// original, so readers never see a half-written file. The replaced file's
/// permissions carry over; a new file gets `0o644`.
pub fn write_output<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {:?}", dir))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {:?}", dir))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing {:?}", tmp.path()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("syncing {:?}", tmp.path()))?;

    let perms = match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(meta.permissions()),
        _ => default_permissions(),
    };
    if let Some(perms) = perms {
        tmp.as_file()
            .set_permissions(perms)
            .with_context(|| format!("setting permissions on {:?}", tmp.path()))?;
    }

    let tmp_path = tmp.path().to_path_buf();
    // unwrap to the io error so the temp file is removed on failure
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_parent_and_overwrites() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("data").join("aba-data.js");

        write_output(&target, "first\n")?;
        assert_eq!(fs::read_to_string(&target)?, "first\n");

        write_output(&target, "second\n")?;
        assert_eq!(fs::read_to_string(&target)?, "second\n");

        // only the target remains; no temp files left behind
        let entries: Vec<_> = fs::read_dir(dir.path().join("data"))?.collect();
        assert_eq!(entries.len(), 1);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn new_file_is_world_readable() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir()?;
        let target = dir.path().join("aba-data.js");

        write_output(&target, "new\n")?;
        let mode = fs::metadata(&target)?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_keeps_existing_mode() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir()?;
        let target = dir.path().join("aba-data.js");

        fs::write(&target, "old\n")?;
        fs::set_permissions(&target, fs::Permissions::from_mode(0o644))?;
        write_output(&target, "new\n")?;
        assert_eq!(fs::metadata(&target)?.permissions().mode() & 0o777, 0o644);

        fs::set_permissions(&target, fs::Permissions::from_mode(0o640))?;
        write_output(&target, "newer\n")?;
        assert_eq!(fs::metadata(&target)?.permissions().mode() & 0o777, 0o640);
        assert_eq!(fs::read_to_string(&target)?, "newer\n");
        Ok(())
    }

    #[test]
    fn target_that_is_a_directory_fails() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("aba-data.js");
        fs::create_dir(&target)?;
        fs::write(target.join("keep.txt"), "x")?;

        let err = write_output(&target, "new\n").unwrap_err();
        assert!(format!("{:#}", err).contains("renaming"));
        assert!(target.is_dir());

        // the temp file is cleaned up when the rename fails
        let entries: Vec<_> = fs::read_dir(dir.path())?.collect();
        assert_eq!(entries.len(), 1);
        Ok(())
    }
}
