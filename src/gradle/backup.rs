// src/gradle/backup.rs

//! Backup and restore of the primary build file around its mutation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use blake3::Hasher;
use tracing::{debug, error, info};

use crate::errors::{ImpactError, Result};

pub fn backup_path(dir: &Path, build_file: &str) -> PathBuf {
    dir.join(format!("{build_file}.bak"))
}

/// Copy `dir/build_file` to `dir/build_file.bak`.
///
/// An existing backup is never overwritten: it is the only pristine copy
/// left by an interrupted run. Use [`restore`] (or `--recover`) first.
pub fn backup(dir: &Path, build_file: &str) -> Result<()> {
    let source_path = dir.join(build_file);
    let target_path = backup_path(dir, build_file);

    let mut source = File::open(&source_path).map_err(|e| {
        ImpactError::BackupError(format!("opening {}: {e}", source_path.display()))
    })?;
    let expected = source
        .metadata()
        .map_err(|e| ImpactError::BackupError(format!("stat {}: {e}", source_path.display())))?
        .len();

    let mut target = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target_path)
        .map_err(|e| {
            let hint = if e.kind() == io::ErrorKind::AlreadyExists {
                " (stale backup from an interrupted run; run with --recover)"
            } else {
                ""
            };
            ImpactError::BackupError(format!(
                "creating {}: {e}{hint}",
                target_path.display()
            ))
        })?;

    let copied = io::copy(&mut source, &mut target)
        .and_then(|n| target.sync_all().map(|_| n))
        .map_err(|e| {
            ImpactError::BackupError(format!(
                "copying {} to {}: {e}",
                source_path.display(),
                target_path.display()
            ))
        });

    let copied = match copied {
        Ok(n) => n,
        Err(e) => {
            drop(target);
            let _ = fs::remove_file(&target_path);
            return Err(e);
        }
    };

    if copied != expected {
        drop(target);
        let _ = fs::remove_file(&target_path);
        return Err(ImpactError::BackupError(format!(
            "short copy of {}: {copied} of {expected} bytes",
            source_path.display()
        )));
    }

    debug!(
        from = %source_path.display(),
        to = %target_path.display(),
        bytes = copied,
        "backed up build file"
    );
    Ok(())
}

/// Remove the (mutated) build file and rename the backup into its place.
pub fn restore(dir: &Path, build_file: &str) -> Result<()> {
    let original = dir.join(build_file);
    let saved = backup_path(dir, build_file);

    if !saved.is_file() {
        return Err(ImpactError::RestoreError(format!(
            "backup {} is missing",
            saved.display()
        )));
    }

    match fs::remove_file(&original) {
        Ok(()) => {}
        // Someone already removed it; the rename below still brings it back.
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ImpactError::RestoreError(format!(
                "removing {}: {e}",
                original.display()
            )));
        }
    }

    fs::rename(&saved, &original).map_err(|e| {
        ImpactError::RestoreError(format!(
            "renaming {} to {}: {e}",
            saved.display(),
            original.display()
        ))
    })?;

    debug!(path = %original.display(), "restored build file");
    Ok(())
}

/// Whether a backup for `build_file` is lying around in `dir`.
pub fn has_backup(dir: &Path, build_file: &str) -> bool {
    backup_path(dir, build_file).is_file()
}

/// Compute the blake3 digest of a file.
pub fn file_digest(path: &Path) -> io::Result<String> {
    let mut hasher = Hasher::new();
    let mut file = File::open(path)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Scoped backup of the primary build file.
///
/// Obtained from a successful [`backup`]. [`BuildFileGuard::restore`]
/// releases it explicitly and verifies the restored bytes against the digest
/// taken at backup time. A guard dropped without release (early return,
/// panic, cancelled future) restores in `Drop` and logs any failure.
#[derive(Debug)]
pub struct BuildFileGuard {
    dir: PathBuf,
    build_file: String,
    digest: String,
    armed: bool,
}

impl BuildFileGuard {
    pub fn acquire(dir: &Path, build_file: &str) -> Result<Self> {
        let digest = file_digest(&dir.join(build_file)).map_err(|e| {
            ImpactError::BackupError(format!("hashing {build_file}: {e}"))
        })?;
        backup(dir, build_file)?;

        info!(build_file, digest = %digest, "build file backed up");
        Ok(Self {
            dir: dir.to_path_buf(),
            build_file: build_file.to_string(),
            digest,
            armed: true,
        })
    }

    pub fn build_file_path(&self) -> PathBuf {
        self.dir.join(&self.build_file)
    }

    /// Put the original build file back and check it is byte-identical.
    pub fn restore(mut self) -> Result<()> {
        self.armed = false;
        self.restore_and_verify()
    }

    fn restore_and_verify(&self) -> Result<()> {
        restore(&self.dir, &self.build_file)?;

        let path = self.build_file_path();
        let digest = file_digest(&path).map_err(|e| {
            ImpactError::RestoreError(format!("hashing restored {}: {e}", path.display()))
        })?;
        if digest != self.digest {
            return Err(ImpactError::RestoreError(format!(
                "restored {} differs from the original (digest {digest}, expected {})",
                path.display(),
                self.digest
            )));
        }

        info!(build_file = %self.build_file, "build file restored");
        Ok(())
    }
}

impl Drop for BuildFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.restore_and_verify() {
            error!(error = %e, build_file = %self.build_file, "could not restore build file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn append(path: &Path, bytes: &[u8]) {
        let mut f = OpenOptions::new().append(true).open(path).unwrap();
        f.write_all(bytes).unwrap();
    }

    const ORIGINAL: &[u8] = b"plugins {\n    id 'java'\n}\n";

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("build.gradle"), ORIGINAL).unwrap();
        dir
    }

    #[test]
    fn backup_copies_bytes() {
        let dir = project();
        backup(dir.path(), "build.gradle").unwrap();
        assert_eq!(fs::read(dir.path().join("build.gradle.bak")).unwrap(), ORIGINAL);
    }

    #[test]
    fn backup_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = backup(dir.path(), "build.gradle").unwrap_err();
        assert!(matches!(err, ImpactError::BackupError(_)));
        assert!(!dir.path().join("build.gradle.bak").exists());
    }

    #[test]
    fn backup_refuses_to_overwrite_stale_backup() {
        let dir = project();
        fs::write(dir.path().join("build.gradle.bak"), b"pristine").unwrap();

        let err = backup(dir.path(), "build.gradle").unwrap_err();
        assert!(err.to_string().contains("--recover"));
        assert_eq!(fs::read(dir.path().join("build.gradle.bak")).unwrap(), b"pristine");
    }

    #[test]
    fn restore_undoes_mutation() {
        let dir = project();
        backup(dir.path(), "build.gradle").unwrap();
        append(&dir.path().join("build.gradle"), b"apply from: 'x.gradle'\n");

        restore(dir.path(), "build.gradle").unwrap();
        assert_eq!(fs::read(dir.path().join("build.gradle")).unwrap(), ORIGINAL);
        assert!(!dir.path().join("build.gradle.bak").exists());
    }

    #[test]
    fn restore_without_backup_fails_and_keeps_file() {
        let dir = project();
        let err = restore(dir.path(), "build.gradle").unwrap_err();
        assert!(matches!(err, ImpactError::RestoreError(_)));
        assert_eq!(fs::read(dir.path().join("build.gradle")).unwrap(), ORIGINAL);
    }

    #[test]
    fn guard_restores_on_drop() {
        let dir = project();
        {
            let guard = BuildFileGuard::acquire(dir.path(), "build.gradle").unwrap();
            append(&guard.build_file_path(), b"\napply from: 'x.gradle'\n");
        }
        assert_eq!(fs::read(dir.path().join("build.gradle")).unwrap(), ORIGINAL);
        assert!(!has_backup(dir.path(), "build.gradle"));
    }

    #[test]
    fn guard_detects_tampered_backup() {
        let dir = project();
        let guard = BuildFileGuard::acquire(dir.path(), "build.gradle").unwrap();
        fs::write(dir.path().join("build.gradle.bak"), b"something else").unwrap();

        let err = guard.restore().unwrap_err();
        assert!(err.to_string().contains("differs from the original"));
    }
}
