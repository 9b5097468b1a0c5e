//! Scoped registration of transient file-preview handles
//!
//! A preview handle is a process-wide resource (typically an object URI
//! pointing at file bytes) created so the presentation layer can display a
//! freshly picked file before it is uploaded. Handles are acquired when an
//! attachment is set and must be released when the attachment is replaced
//! or its owning row is removed; the registry enforces that contract and
//! releases every outstanding handle when the draft is dropped.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::FileBlob;

/// Opaque token identifying one open preview handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewId(u64);

/// Creates and revokes the actual platform preview resource
///
/// The presentation layer supplies the real implementation (e.g. an
/// object-URI factory). The core only tracks ownership and lifetimes.
pub trait PreviewProvider {
    /// Create a preview resource for the blob, returning its URI
    fn acquire(&mut self, blob: &Arc<FileBlob>) -> String;

    /// Revoke a previously created preview resource
    fn release(&mut self, uri: &str);
}

/// Provider that creates no real resources; the default in headless use
#[derive(Debug, Default)]
pub struct NoopProvider;

impl PreviewProvider for NoopProvider {
    fn acquire(&mut self, blob: &Arc<FileBlob>) -> String {
        format!("noop://{}", blob.filename)
    }

    fn release(&mut self, _uri: &str) {}
}

/// Tracks every open preview handle for one editing session
pub struct PreviewRegistry {
    provider: Box<dyn PreviewProvider>,
    open: HashMap<PreviewId, String>,
    next: u64,
}

impl PreviewRegistry {
    /// Registry over a presentation-supplied provider
    pub fn new(provider: Box<dyn PreviewProvider>) -> Self {
        Self {
            provider,
            open: HashMap::new(),
            next: 0,
        }
    }

    /// Registry that creates no real resources
    pub fn noop() -> Self {
        Self::new(Box::new(NoopProvider))
    }

    /// Acquire a preview handle for a blob
    pub fn acquire(&mut self, blob: &Arc<FileBlob>) -> PreviewId {
        let id = PreviewId(self.next);
        self.next += 1;
        let uri = self.provider.acquire(blob);
        self.open.insert(id, uri);
        id
    }

    /// Release one handle; releasing an already-released handle is a no-op
    pub fn release(&mut self, id: PreviewId) {
        if let Some(uri) = self.open.remove(&id) {
            self.provider.release(&uri);
        }
    }

    /// The URI backing an open handle, for the presentation layer
    pub fn uri(&self, id: PreviewId) -> Option<&str> {
        self.open.get(&id).map(|s| s.as_str())
    }

    /// Number of handles currently open
    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

impl Drop for PreviewRegistry {
    fn drop(&mut self) {
        let ids: Vec<PreviewId> = self.open.keys().copied().collect();
        for id in ids {
            self.release(id);
        }
    }
}

impl std::fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewRegistry")
            .field("open", &self.open.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Provider that records every acquire/release for assertions
    struct RecordingProvider {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl PreviewProvider for RecordingProvider {
        fn acquire(&mut self, blob: &Arc<FileBlob>) -> String {
            let uri = format!("mem://{}", blob.filename);
            self.log.borrow_mut().push(format!("acquire {}", uri));
            uri
        }

        fn release(&mut self, uri: &str) {
            self.log.borrow_mut().push(format!("release {}", uri));
        }
    }

    fn blob(name: &str) -> Arc<FileBlob> {
        Arc::new(FileBlob {
            bytes: vec![1, 2, 3],
            filename: name.to_string(),
            content_type: "application/octet-stream".to_string(),
        })
    }

    #[test]
    fn test_acquire_release_balanced() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = PreviewRegistry::new(Box::new(RecordingProvider { log: log.clone() }));
        let id = reg.acquire(&blob("a.pdf"));
        assert_eq!(reg.open_count(), 1);
        assert_eq!(reg.uri(id), Some("mem://a.pdf"));
        reg.release(id);
        assert_eq!(reg.open_count(), 0);
        assert_eq!(
            log.borrow().as_slice(),
            ["acquire mem://a.pdf", "release mem://a.pdf"]
        );
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut reg = PreviewRegistry::noop();
        let id = reg.acquire(&blob("a.pdf"));
        reg.release(id);
        reg.release(id);
        assert_eq!(reg.open_count(), 0);
    }

    #[test]
    fn test_drop_releases_everything() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut reg = PreviewRegistry::new(Box::new(RecordingProvider { log: log.clone() }));
            reg.acquire(&blob("a.pdf"));
            reg.acquire(&blob("b.pdf"));
        }
        let releases = log
            .borrow()
            .iter()
            .filter(|l| l.starts_with("release"))
            .count();
        assert_eq!(releases, 2);
    }
}
