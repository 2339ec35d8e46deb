use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ReconstructError;

static NEXT_TEMP_FILE_ID: AtomicUsize = AtomicUsize::new(0);

/// Sibling path used to stage writes to `destination`.
pub(crate) fn temporary_destination_path(destination: &Path, unique: usize) -> PathBuf {
    let file_name = destination
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let temp_name = format!(".{file_name}.deltasync-{}-{unique}.tmp", process::id());
    destination.with_file_name(temp_name)
}

/// Stages output in a temporary sibling and renames it over the destination
/// on [`commit`](Self::commit). The staging file is removed if the guard is
/// dropped uncommitted.
pub(crate) struct DestinationWriteGuard {
    final_path: PathBuf,
    temp_path: PathBuf,
    committed: bool,
}

impl DestinationWriteGuard {
    pub(crate) fn new(destination: &Path) -> Result<(Self, fs::File), ReconstructError> {
        loop {
            let unique = NEXT_TEMP_FILE_ID.fetch_add(1, Ordering::Relaxed);
            let temp_path = temporary_destination_path(destination, unique);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)
            {
                Ok(file) => {
                    return Ok((
                        Self {
                            final_path: destination.to_path_buf(),
                            temp_path,
                            committed: false,
                        },
                        file,
                    ));
                }
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(error) => {
                    return Err(ReconstructError::io("create staging file", &temp_path, error));
                }
            }
        }
    }

    pub(crate) fn staging_path(&self) -> &Path {
        &self.temp_path
    }

    pub(crate) fn commit(mut self) -> Result<(), ReconstructError> {
        match fs::rename(&self.temp_path, &self.final_path) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                remove_existing_destination(&self.final_path)?;
                fs::rename(&self.temp_path, &self.final_path).map_err(|rename_error| {
                    ReconstructError::io("finalise staging file", &self.temp_path, rename_error)
                })?;
            }
            Err(error) => {
                return Err(ReconstructError::io(
                    "finalise staging file",
                    &self.temp_path,
                    error,
                ));
            }
        }
        self.committed = true;
        Ok(())
    }
}

impl Drop for DestinationWriteGuard {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

fn remove_existing_destination(path: &Path) -> Result<(), ReconstructError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(ReconstructError::io("remove existing destination", path, error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn temporary_path_is_hidden_sibling() {
        let path = temporary_destination_path(Path::new("/data/file.bin"), 7);
        assert_eq!(path.parent(), Some(Path::new("/data")));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".file.bin.deltasync-"));
        assert!(name.ends_with("-7.tmp"));
    }

    #[test]
    fn commit_replaces_destination() {
        let temp = tempdir().expect("tempdir");
        let destination = temp.path().join("target.txt");
        fs::write(&destination, b"old").expect("write");

        let (guard, mut file) = DestinationWriteGuard::new(&destination).expect("guard");
        file.write_all(b"new").expect("write staging");
        drop(file);
        let staging = guard.staging_path().to_path_buf();
        guard.commit().expect("commit");

        assert_eq!(fs::read(&destination).expect("read"), b"new");
        assert!(!staging.exists());
    }

    #[test]
    fn dropped_guard_removes_staging_file() {
        let temp = tempdir().expect("tempdir");
        let destination = temp.path().join("target.txt");
        fs::write(&destination, b"keep").expect("write");

        let (guard, file) = DestinationWriteGuard::new(&destination).expect("guard");
        let staging = guard.staging_path().to_path_buf();
        drop(file);
        assert!(staging.exists());
        drop(guard);

        assert!(!staging.exists());
        assert_eq!(fs::read(&destination).expect("read"), b"keep");
    }

    #[test]
    fn guards_use_distinct_staging_paths() {
        let temp = tempdir().expect("tempdir");
        let destination = temp.path().join("target.txt");
        let (first, _a) = DestinationWriteGuard::new(&destination).expect("first");
        let (second, _b) = DestinationWriteGuard::new(&destination).expect("second");
        assert_ne!(first.staging_path(), second.staging_path());
    }

    #[test]
    fn remove_existing_destination_succeeds_when_not_found() {
        let temp = tempdir().expect("tempdir");
        assert!(remove_existing_destination(&temp.path().join("missing")).is_ok());
    }
}
