use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::Path;

const FALLBACK_MIME: &str = "application/octet-stream";
const TEXT_MIME: &str = "text/plain";

/// The upload candidate picked in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl PendingFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk; the MIME type is sniffed from its content.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("'{}' is not a file", path.display()))?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let mime_type = sniff_mime(&bytes);
        Ok(Self::new(name, mime_type, bytes))
    }

    /// A raw text value typed instead of a picked file. It has no name.
    pub fn from_text(value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self::new("", TEXT_MIME, value)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// An empty text value. It stands for "no file" rather than an empty one.
    pub fn is_blank_text(&self) -> bool {
        self.name.is_empty() && self.bytes.is_empty()
    }
}

fn sniff_mime(bytes: &[u8]) -> String {
    match infer::get(bytes) {
        Some(kind) => kind.mime_type().to_string(),
        None if std::str::from_utf8(bytes).is_ok() => TEXT_MIME.to_string(),
        None => FALLBACK_MIME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_png() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(sniff_mime(&png), "image/png");
    }

    #[test]
    fn test_sniff_text_and_binary() {
        assert_eq!(sniff_mime(b"sepal_length,species\n5.1,setosa\n"), "text/plain");
        assert_eq!(sniff_mime(&[0x00, 0x9f, 0x92, 0x96]), FALLBACK_MIME);
    }

    #[tokio::test]
    async fn test_from_path_keeps_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("iris.csv");
        tokio::fs::write(&path, "a,b\n1,2\n").await.unwrap();

        let file = PendingFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "iris.csv");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.len(), 8);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(PendingFile::from_path(dir.path().join("nope.bin")).await.is_err());
    }

    #[test]
    fn test_from_text() {
        let file = PendingFile::from_text("hello");
        assert_eq!(file.name, "");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(&file.bytes[..], b"hello");
        assert!(!file.is_blank_text());
        assert!(PendingFile::from_text("").is_blank_text());
    }

    #[tokio::test]
    async fn test_empty_file_on_disk_is_not_blank() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        tokio::fs::write(&path, "").await.unwrap();

        let file = PendingFile::from_path(&path).await.unwrap();
        assert!(file.is_empty());
        assert!(!file.is_blank_text());
    }
}
