//! Physical file operations for a resolved pair.

use crate::error::RelocateError;
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Place a copy of `src` at `dst`, leaving `src` untouched.
///
/// A hard link is tried first; if the platform or filesystem refuses it the
/// contents are copied and synced. An existing `dst` that already is `src`
/// counts as done.
pub(crate) fn link_or_copy(src: &Path, dst: &Path) -> Result<(), RelocateError> {
    let copy_error = |source: io::Error| RelocateError::CopyKeeper {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    };

    let src_meta = fs::metadata(src).map_err(copy_error)?;
    if !src_meta.is_file() {
        return Err(RelocateError::NotARegularFile {
            path: src.to_path_buf(),
        });
    }

    match fs::metadata(dst) {
        Ok(dst_meta) => {
            if !dst_meta.is_file() {
                return Err(RelocateError::NotARegularFile {
                    path: dst.to_path_buf(),
                });
            }
            if same_file(src, &src_meta, dst, &dst_meta) {
                return Ok(());
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(copy_error(e)),
    }

    if fs::hard_link(src, dst).is_ok() {
        return Ok(());
    }

    copy_contents(src, dst).map_err(copy_error)
}

/// Move `src` to `dst` with a single rename.
///
/// No copy-then-delete fallback: a rename across filesystems fails and the
/// file stays where it was.
pub(crate) fn move_file(src: &Path, dst: &Path) -> Result<(), RelocateError> {
    if dst.exists() {
        return Err(RelocateError::DestinationExists {
            path: dst.to_path_buf(),
        });
    }

    fs::rename(src, dst).map_err(|source| RelocateError::MoveDiscarded {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    })
}

fn copy_contents(src: &Path, dst: &Path) -> io::Result<()> {
    let mut input = File::open(src)?;
    let mut output = File::create(dst)?;
    io::copy(&mut input, &mut output)?;
    output.sync_all()
}

#[cfg(unix)]
fn same_file(_src: &Path, src_meta: &fs::Metadata, _dst: &Path, dst_meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    src_meta.dev() == dst_meta.dev() && src_meta.ino() == dst_meta.ino()
}

#[cfg(not(unix))]
fn same_file(src: &Path, _src_meta: &fs::Metadata, dst: &Path, _dst_meta: &fs::Metadata) -> bool {
    match (fs::canonicalize(src), fs::canonicalize(dst)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
