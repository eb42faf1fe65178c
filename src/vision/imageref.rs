//! Image reference normalization
//!
//! Capture backends hand back raw filesystem paths; the recognizer consumes
//! a stable `file://` reference. Canonicalizing stats the file, so a frame
//! that vanished between capture and recognition fails here instead of deep
//! inside the OCR backend. The same reference form is produced on every
//! platform.

use std::io;
use std::path::Path;

pub const FILE_SCHEME: &str = "file://";

/// Resolve a captured frame path to the reference form fed to recognition.
pub fn to_image_ref(path: &Path) -> io::Result<String> {
    let canonical = path.canonicalize()?;
    Ok(format!("{FILE_SCHEME}{}", canonical.display()))
}

/// Strip the file scheme from a reference, yielding a plain path. Bare
/// paths pass through unchanged.
pub fn from_image_ref(image_ref: &str) -> &Path {
    Path::new(image_ref.strip_prefix(FILE_SCHEME).unwrap_or(image_ref))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_file_gets_file_scheme() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let image_ref = to_image_ref(file.path()).unwrap();

        assert!(image_ref.starts_with(FILE_SCHEME));
        assert!(from_image_ref(&image_ref).exists());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("no-such-frame.png");

        assert!(to_image_ref(&gone).is_err());
    }

    #[test]
    fn test_bare_path_passes_through() {
        assert_eq!(
            from_image_ref("/tmp/frame.png"),
            Path::new("/tmp/frame.png")
        );
    }
}
