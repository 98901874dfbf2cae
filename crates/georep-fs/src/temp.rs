use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Prefix of every staging file created by this crate.
pub const TEMP_PREFIX: &str = "tmp_";

#[cfg(unix)]
const DEFAULT_PERMISSIONS: u32 = 0o666;

#[derive(Clone, Debug)]
pub struct TempFileOptions {
    prefix:      String,
    #[cfg(unix)]
    permissions: u32,
}

impl Default for TempFileOptions {
    fn default() -> Self { Self::new() }
}

impl TempFileOptions {
    pub fn new() -> Self {
        Self {
            prefix:      TEMP_PREFIX.to_string(),
            #[cfg(unix)]
            permissions: DEFAULT_PERMISSIONS,
        }
    }

    /// Extend the default prefix, e.g. with the resource being staged.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Requested mode; the process umask still applies at creation.
    #[cfg(unix)]
    #[must_use]
    pub fn permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn prefix_str(&self) -> &str { &self.prefix }
}

/// A uniquely named file that is closed and unlinked when dropped.
///
/// Create it in the destination's own directory so the final promotion is a
/// same-filesystem rename.
#[derive(Debug)]
pub struct ScopedTempFile {
    inner: NamedTempFile,
}

impl ScopedTempFile {
    pub fn new_in(dir: impl AsRef<Path>, options: &TempFileOptions) -> Result<Self> {
        let dir = dir.as_ref();
        let mut builder = tempfile::Builder::new();
        builder.prefix(options.prefix_str());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(options.permissions));
        }

        let inner = builder.tempfile_in(dir).map_err(|source| Error::TempFile {
            dir: dir.to_path_buf(),
            source,
        })?;

        Ok(Self { inner })
    }

    /// Create in the system temp directory, for destinations that are not on
    /// local disk.
    pub fn new(options: &TempFileOptions) -> Result<Self> { Self::new_in(std::env::temp_dir(), options) }

    pub fn path(&self) -> &Path { self.inner.path() }

    pub fn as_file(&self) -> &File { self.inner.as_file() }

    /// A second handle on the same open file description, for async writers.
    pub fn try_clone_file(&self) -> Result<File> { Ok(self.inner.as_file().try_clone()?) }

    pub fn size(&self) -> Result<u64> { Ok(self.inner.as_file().metadata()?.len()) }

    /// Close and unlink. A file already moved away by a successful promotion
    /// is not an error.
    pub fn close(self) -> Result<()> {
        let path: PathBuf = self.inner.path().to_path_buf();
        match self.inner.close() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Remove { path, source }),
        }
    }
}
