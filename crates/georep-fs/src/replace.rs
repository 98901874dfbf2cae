use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::temp::{ScopedTempFile, TempFileOptions};
use crate::{Error, Result};

/// Atomically replace `dest` with the content of `src`.
///
/// `src` is moved, not copied, when both paths share a filesystem. Across
/// filesystems the content is first copied to a staging file beside `dest`
/// so readers never observe a partially written destination.
pub fn replace_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    if dest.is_dir() {
        return Err(Error::IsDirectory(dest.to_path_buf()));
    }

    match std::fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => copy_into_place(src, dest),
        Err(source) => Err(Error::Replace {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            source,
        }),
    }
}

/// Cross-filesystem fallback: copy to a staging file beside `dest`, rename it
/// over `dest`, then drop `src`.
fn copy_into_place(src: &Path, dest: &Path) -> Result<()> {
    let replace_err = |source| Error::Replace {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        source,
    };

    let parent = dest.parent().unwrap_or(Path::new("."));
    let staged = ScopedTempFile::new_in(parent, &TempFileOptions::new())?;
    std::fs::copy(src, staged.path()).map_err(replace_err)?;
    std::fs::rename(staged.path(), dest).map_err(replace_err)?;
    staged.close()?;

    if let Err(e) = std::fs::remove_file(src) {
        debug!(path = %src.display(), error = %e, "source left behind after copy");
    }
    Ok(())
}
