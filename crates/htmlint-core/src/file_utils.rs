//! Hardened file reading
//!
//! Pages are read through [`safe_read_file`], which refuses to follow
//! symlinks, skips anything that is not a regular file and caps the size so a
//! stray multi-megabyte export cannot stall a project run.
//!
//! The metadata check and the read are two separate syscalls, so a file can
//! still be swapped in between. That window is accepted for a linter.

use crate::diagnostics::{LintError, LintResult};
use std::fs;
use std::path::Path;

/// Largest page read by default (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

const UTF8_BOM: char = '\u{feff}';

/// Read a page with the default size cap.
///
/// # Errors
///
/// - [`LintError::FileSymlink`] for symlinks, dangling or not
/// - [`LintError::FileNotRegular`] for directories, FIFOs and devices
/// - [`LintError::FileTooBig`] above [`DEFAULT_MAX_FILE_SIZE`]
/// - [`LintError::FileRead`] for any other I/O or UTF-8 failure
pub fn safe_read_file(path: &Path) -> LintResult<String> {
    safe_read_file_with_limit(path, DEFAULT_MAX_FILE_SIZE)
}

/// Read a page with a custom size cap; a file of exactly `max_size` bytes is
/// accepted. A leading byte order mark is dropped so positions line up with
/// what editors show.
pub fn safe_read_file_with_limit(path: &Path, max_size: u64) -> LintResult<String> {
    let read_error = |source| LintError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    // symlink_metadata does not follow the link
    let metadata = fs::symlink_metadata(path).map_err(read_error)?;

    if metadata.file_type().is_symlink() {
        return Err(LintError::FileSymlink {
            path: path.to_path_buf(),
        });
    }

    if !metadata.is_file() {
        return Err(LintError::FileNotRegular {
            path: path.to_path_buf(),
        });
    }

    let size = metadata.len();
    if size > max_size {
        return Err(LintError::FileTooBig {
            path: path.to_path_buf(),
            size,
            limit: max_size,
        });
    }

    let content = fs::read_to_string(path).map_err(read_error)?;
    Ok(match content.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_page() {
        let temp = TempDir::new().unwrap();
        let page = temp.path().join("index.html");
        fs::write(&page, "<p>hello</p>").unwrap();

        assert_eq!(safe_read_file(&page).unwrap(), "<p>hello</p>");
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let temp = TempDir::new().unwrap();
        let page = temp.path().join("bom.html");
        fs::write(&page, "\u{feff}<!DOCTYPE html>").unwrap();

        assert_eq!(safe_read_file(&page).unwrap(), "<!DOCTYPE html>");
    }

    #[test]
    fn test_missing_file() {
        let err = safe_read_file(Path::new("/nonexistent/dir/page.html")).unwrap_err();
        assert!(matches!(err, LintError::FileRead { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let temp = TempDir::new().unwrap();
        let page = temp.path().join("latin1.html");
        fs::write(&page, [b'<', b'p', b'>', 0xe9, b'<']).unwrap();

        let err = safe_read_file(&page).unwrap_err();
        assert!(matches!(err, LintError::FileRead { .. }));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let temp = TempDir::new().unwrap();
        let page = temp.path().join("big.html");
        fs::write(&page, vec![b'x'; 512]).unwrap();
        assert!(safe_read_file_with_limit(&page, 512).is_ok());

        fs::write(&page, vec![b'x'; 513]).unwrap();
        match safe_read_file_with_limit(&page, 512).unwrap_err() {
            LintError::FileTooBig { size, limit, .. } => {
                assert_eq!(size, 513);
                assert_eq!(limit, 512);
            }
            other => panic!("Expected FileTooBig, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_rejected() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("site.html");
        fs::create_dir(&dir).unwrap();

        assert!(matches!(
            safe_read_file(&dir).unwrap_err(),
            LintError::FileNotRegular { .. }
        ));
    }

    #[cfg(unix)]
    mod unix_tests {
        use super::*;
        use std::os::unix::fs::symlink;

        #[test]
        fn test_symlink_rejected() {
            let temp = TempDir::new().unwrap();
            let target = temp.path().join("real.html");
            let link = temp.path().join("alias.html");
            fs::write(&target, "<p>x</p>").unwrap();
            symlink(&target, &link).unwrap();

            match safe_read_file(&link).unwrap_err() {
                LintError::FileSymlink { path } => assert_eq!(path, link),
                other => panic!("Expected FileSymlink, got {:?}", other),
            }
        }

        #[test]
        fn test_dangling_symlink_rejected() {
            let temp = TempDir::new().unwrap();
            let link = temp.path().join("gone.html");
            symlink("/nonexistent/target.html", &link).unwrap();

            assert!(matches!(
                safe_read_file(&link).unwrap_err(),
                LintError::FileSymlink { .. }
            ));
        }
    }
}
