//! Upload filtering and storage naming for product images.
//!
//! Both functions look only at the client-declared file name; the bytes are
//! never inspected here.

use crate::error::AssetError;
use time::OffsetDateTime;

/// Image extensions accepted for upload (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Upper bound (inclusive) of the random component in storage names.
const RANDOM_SUFFIX_MAX: u32 = 1_000_000_000;

/// Descriptor of an uploaded file as declared by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    /// Multipart field the file arrived in.
    pub field_name: String,
    /// Original client-side file name.
    pub original_name: String,
}

impl UploadedFile {
    pub fn new(field_name: impl Into<String>, original_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            original_name: original_name.into(),
        }
    }

    /// Extension as written by the client, if it is an allowed image type.
    fn accepted_extension(&self) -> Option<&str> {
        let (_, ext) = self.original_name.rsplit_once('.')?;
        ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            .then_some(ext)
    }
}

/// Decide whether an upload is accepted.
pub fn filter(file: Option<&UploadedFile>) -> Result<(), AssetError> {
    let file = file.ok_or(AssetError::MissingFile)?;
    match file.accepted_extension() {
        Some(_) => Ok(()),
        None => Err(AssetError::DisallowedExtension(file.original_name.clone())),
    }
}

/// Derive the storage name for an accepted upload:
/// `{field}-{unix millis}-{random}.{ext}`.
///
/// Uniqueness rests on the timestamp and random component alone; there is no
/// existence check.
pub fn name(file: Option<&UploadedFile>) -> Result<String, AssetError> {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix = rand::random_range(0..=RANDOM_SUFFIX_MAX);
    name_with(file, millis, suffix)
}

/// Deterministic form of [`name`].
pub fn name_with(
    file: Option<&UploadedFile>,
    millis: i128,
    suffix: u32,
) -> Result<String, AssetError> {
    let file = file.ok_or(AssetError::MissingFile)?;
    let ext = file
        .accepted_extension()
        .ok_or_else(|| AssetError::DisallowedExtension(file.original_name.clone()))?;
    Ok(format!("{}-{}-{}.{}", file.field_name, millis, suffix, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> UploadedFile {
        UploadedFile::new("file", name)
    }

    #[test]
    fn test_filter_rejects_missing_file() {
        assert_eq!(filter(None), Err(AssetError::MissingFile));
        assert_eq!(name(None), Err(AssetError::MissingFile));
    }

    #[test]
    fn test_filter_extension_rules() {
        assert!(filter(Some(&upload("photo.txt"))).is_err());
        assert!(filter(Some(&upload("photo"))).is_err());
        assert!(filter(Some(&upload("photo.jpg.exe"))).is_err());
        assert!(filter(Some(&upload("photo.JPG"))).is_ok());
        assert!(filter(Some(&upload("photo.png"))).is_ok());
        assert!(filter(Some(&upload("archive.tar.gif"))).is_ok());
        assert!(filter(Some(&upload("photo.Jpeg"))).is_ok());
    }

    #[test]
    fn test_name_layout_keeps_extension_case() {
        let derived = name_with(Some(&upload("Photo.JPG")), 1_700_000_000_123, 42).unwrap();
        assert_eq!(derived, "file-1700000000123-42.JPG");
    }

    #[test]
    fn test_name_rejects_disallowed_extension() {
        assert_eq!(
            name(Some(&upload("notes.txt"))),
            Err(AssetError::DisallowedExtension("notes.txt".to_string()))
        );
    }

    #[test]
    fn test_name_components() {
        let derived = name(Some(&upload("photo.png"))).unwrap();
        let stem = derived.strip_suffix(".png").unwrap();
        let parts: Vec<&str> = stem.splitn(3, '-').collect();
        assert_eq!(parts[0], "file");
        assert!(parts[1].parse::<i128>().unwrap() > 0);
        assert!(parts[2].parse::<u32>().unwrap() <= RANDOM_SUFFIX_MAX);
    }

    #[test]
    fn test_same_instant_names_differ_by_random_component() {
        let file = upload("photo.png");
        let a = name_with(Some(&file), 1_000, 1).unwrap();
        let b = name_with(Some(&file), 1_000, 2).unwrap();
        assert_ne!(a, b);
    }
}
