use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const ARTIFACT_PREFIX: &str = "meditation_";
pub const ARTIFACT_EXTENSION: &str = "wav";

/// Output directory holding exported meditation files.
///
/// Artifacts are written under a dot-prefixed temporary name and renamed into
/// place once complete, so a reader never sees a half-written file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if missing. Safe to call concurrently.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Fresh artifact file name carrying a full v4 uuid,
    /// e.g. `meditation_3f9a1c2e0b7d4e5fa1c2b3d4e5f60718.wav`.
    pub fn new_artifact_name(&self) -> String {
        format!(
            "{}{}.{}",
            ARTIFACT_PREFIX,
            Uuid::new_v4().simple(),
            ARTIFACT_EXTENSION
        )
    }

    /// Run `write` against a temporary path, then publish the result as `name`.
    ///
    /// The temporary file is removed when `write` fails. An existing artifact
    /// named `name` is never replaced; that case is an `AlreadyExists` error.
    pub fn write_atomically<E, F>(&self, name: &str, write: F) -> Result<PathBuf, E>
    where
        E: From<std::io::Error>,
        F: FnOnce(&Path) -> Result<(), E>,
    {
        self.ensure_dir()?;

        let final_path = self.dir.join(name);
        let partial_path = self.dir.join(format!(".{}.partial", name));

        if final_path.exists() {
            return Err(already_exists(&final_path).into());
        }

        if let Err(err) = write(&partial_path) {
            let _ = std::fs::remove_file(&partial_path);
            return Err(err);
        }

        if final_path.exists() {
            let _ = std::fs::remove_file(&partial_path);
            return Err(already_exists(&final_path).into());
        }

        if let Err(err) = std::fs::rename(&partial_path, &final_path) {
            let _ = std::fs::remove_file(&partial_path);
            return Err(err.into());
        }

        Ok(final_path)
    }

    /// Resolve a download request to an existing artifact path.
    ///
    /// Returns `None` for names that could escape the directory or point at
    /// temporary files, and for files that do not exist.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if !is_safe_name(name) {
            return None;
        }
        let path = self.dir.join(name);
        path.is_file().then_some(path)
    }
}

fn already_exists(path: &Path) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("artifact {} already exists", path.display()),
    )
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(|c: char| c == '/' || c == '\\')
        && !name.contains("..")
}
