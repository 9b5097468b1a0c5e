//! Binary file attachments (trainee photo, weekly document files)
//!
//! Attachment equality is reference identity over the shared blob, never a
//! byte comparison: the diff engine only needs to know whether the user
//! picked a new file since the baseline was captured, and comparing large
//! file contents on every diff would be wasted work.

use std::fmt;
use std::sync::Arc;

/// Immutable file contents plus the metadata the wire format needs
pub struct FileBlob {
    /// Raw file bytes, exactly as picked by the user
    pub bytes: Vec<u8>,
    /// Original filename, forwarded to the gateway
    pub filename: String,
    /// MIME type, e.g. `image/jpeg` or `application/pdf`
    pub content_type: String,
}

/// A cheaply cloneable handle to one picked file
///
/// Cloning an `Attachment` shares the underlying blob; two clones compare
/// equal. Two attachments built from identical bytes do NOT compare equal.
#[derive(Clone)]
pub struct Attachment {
    blob: Arc<FileBlob>,
}

impl Attachment {
    /// Wrap freshly picked file contents
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            blob: Arc::new(FileBlob {
                bytes,
                filename: filename.into(),
                content_type: content_type.into(),
            }),
        }
    }

    /// The shared blob
    pub fn blob(&self) -> &Arc<FileBlob> {
        &self.blob
    }

    /// Raw file bytes
    pub fn bytes(&self) -> &[u8] {
        &self.blob.bytes
    }

    /// Original filename
    pub fn filename(&self) -> &str {
        &self.blob.filename
    }

    /// MIME type
    pub fn content_type(&self) -> &str {
        &self.blob.content_type
    }

    /// True when both handles reference the same picked file
    pub fn same_ref(&self, other: &Attachment) -> bool {
        Arc::ptr_eq(&self.blob, &other.blob)
    }
}

// Reference identity, not content equality.
impl PartialEq for Attachment {
    fn eq(&self, other: &Self) -> bool {
        self.same_ref(other)
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.blob.filename)
            .field("content_type", &self.blob.content_type)
            .field("len", &self.blob.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_compare_equal() {
        let a = Attachment::new(vec![1, 2, 3], "photo.jpg", "image/jpeg");
        let b = a.clone();
        assert!(a.same_ref(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_identical_bytes_are_not_equal() {
        let a = Attachment::new(vec![1, 2, 3], "photo.jpg", "image/jpeg");
        let b = Attachment::new(vec![1, 2, 3], "photo.jpg", "image/jpeg");
        assert!(!a.same_ref(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_omits_bytes() {
        let a = Attachment::new(vec![0; 1024], "doc.pdf", "application/pdf");
        let s = format!("{:?}", a);
        assert!(s.contains("doc.pdf"));
        assert!(s.contains("1024"));
    }
}
