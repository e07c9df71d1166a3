use serde_json::Value;
use std::collections::HashMap;

/// Bookkeeping for buffers synchronized with the server.
///
/// The open set is the single source of truth for which documents may
/// receive change/close notifications. The registry is pure state; the
/// [`SessionManager`](crate::SessionManager) is its sole owner and issues
/// the actual transport notifications.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    /// Open documents and their last synchronized version
    open: HashMap<String, i32>,
    /// Diagnostics published by the server, per open document
    diagnostics: HashMap<String, Value>,
}

impl DocumentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document as open. Returns false if it was already open.
    pub fn mark_open(&mut self, uri: &str, version: i32) -> bool {
        if self.open.contains_key(uri) {
            return false;
        }
        self.open.insert(uri.to_string(), version);
        true
    }

    /// Record a new synchronized version. Returns false if the document is
    /// not open. Version monotonicity is the caller's contract and is not
    /// validated here.
    pub fn mark_changed(&mut self, uri: &str, version: i32) -> bool {
        match self.open.get_mut(uri) {
            Some(current) => {
                *current = version;
                true
            }
            None => false,
        }
    }

    /// Remove a document from the open set and drop its cached
    /// diagnostics. Returns false if it was not open.
    pub fn mark_closed(&mut self, uri: &str) -> bool {
        self.diagnostics.remove(uri);
        self.open.remove(uri).is_some()
    }

    #[must_use]
    pub fn is_open(&self, uri: &str) -> bool {
        self.open.contains_key(uri)
    }

    /// Last synchronized version of an open document
    #[must_use]
    pub fn version(&self, uri: &str) -> Option<i32> {
        self.open.get(uri).copied()
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Cache server-published diagnostics. Ignored for documents that are
    /// not open.
    pub fn store_diagnostics(&mut self, uri: &str, diagnostics: Value) -> bool {
        if !self.open.contains_key(uri) {
            return false;
        }
        self.diagnostics.insert(uri.to_string(), diagnostics);
        true
    }

    #[must_use]
    pub fn diagnostics(&self, uri: &str) -> Option<&Value> {
        self.diagnostics.get(uri)
    }

    /// Clear the open set and diagnostics cache. Used when the server
    /// restarts and has lost all prior document context.
    pub fn reset(&mut self) {
        self.open.clear();
        self.diagnostics.clear();
    }
}
