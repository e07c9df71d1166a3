use crate::error::{Result, SessionError};
use crate::registry::DocumentRegistry;
use crate::transport::{LanguageServer, ServerStatus};
use chunk_decomposer::Symbol;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Connectivity state of the language-server session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Disconnected,
    Initializing,
    Connected,
    Failed,
}

/// Derive the synchronization URI for a buffer's logical id.
///
/// Deterministic and stable across the buffer's lifetime, so re-opening a
/// buffer always addresses the same server-side document.
#[must_use]
pub fn document_uri(buffer_id: &str) -> String {
    format!("buffer://{buffer_id}")
}

struct SessionInner {
    state: SessionState,
    restart_count: u32,
    last_error: Option<String>,
    registry: DocumentRegistry,
}

/// Owns the external server connection lifecycle and the document registry.
///
/// All shared mutable state (connectivity, open set, diagnostics) lives
/// behind this type and is only mutated through its methods. Operations on
/// one document are serialized through a per-URI lock so the server never
/// observes an inconsistent open/change/close sequence; distinct documents
/// proceed concurrently.
pub struct SessionManager {
    transport: Arc<dyn LanguageServer>,
    inner: RwLock<SessionInner>,
    doc_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionManager {
    #[must_use]
    pub fn new(transport: Arc<dyn LanguageServer>) -> Self {
        Self {
            transport,
            inner: RwLock::new(SessionInner {
                state: SessionState::Disconnected,
                restart_count: 0,
                last_error: None,
                registry: DocumentRegistry::new(),
            }),
            doc_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Start the session. Idempotent: a session that is already
    /// initializing or connected is left alone. On failure the error is
    /// recorded and the session returns to disconnected.
    pub async fn start(&self) -> Result<()> {
        {
            let mut inner = self.inner.write().await;
            match inner.state {
                SessionState::Initializing | SessionState::Connected => return Ok(()),
                _ => inner.state = SessionState::Initializing,
            }
        }

        match self.transport.initialize().await {
            Ok(()) => {
                let mut inner = self.inner.write().await;
                inner.state = SessionState::Connected;
                inner.last_error = None;
                log::info!("language server session connected");
                Ok(())
            }
            Err(err) => {
                let mut inner = self.inner.write().await;
                inner.state = SessionState::Disconnected;
                inner.last_error = Some(err.to_string());
                log::warn!("language server session failed to start: {err}");
                Err(err)
            }
        }
    }

    /// Stop the session and forget all synchronized documents.
    pub async fn stop(&self) {
        if let Err(err) = self.transport.shutdown().await {
            log::warn!("language server shutdown failed: {err}");
        }
        let mut inner = self.inner.write().await;
        inner.state = SessionState::Disconnected;
        inner.registry.reset();
        log::info!("language server session stopped");
    }

    /// Open a buffer for synchronization. No-op if it is already open.
    /// Fails silently (logged) when the session is not connected: callers
    /// treat that as "no synchronization available", not a hard error.
    pub async fn open_document(&self, buffer_id: &str, text: &str, version: i32) {
        let uri = document_uri(buffer_id);
        let lock = self.document_lock(&uri).await;
        let _guard = lock.lock().await;

        {
            let inner = self.inner.read().await;
            if inner.state != SessionState::Connected {
                log::warn!("cannot open {uri}: session not connected");
                return;
            }
            if inner.registry.is_open(&uri) {
                log::debug!("{uri} already open, skipping didOpen");
                return;
            }
        }

        match self.transport.did_open(&uri, text, version).await {
            Ok(()) => {
                self.inner.write().await.registry.mark_open(&uri, version);
            }
            Err(err) => log::warn!("didOpen failed for {uri}: {err}"),
        }
    }

    /// Push a full-replacement change for an open buffer. No-op unless the
    /// buffer is open. The caller supplies a monotonically increasing
    /// version; it is not validated here.
    pub async fn change_document(&self, buffer_id: &str, text: &str, version: i32) {
        let uri = document_uri(buffer_id);
        let lock = self.document_lock(&uri).await;
        let _guard = lock.lock().await;

        {
            let inner = self.inner.read().await;
            if !inner.registry.is_open(&uri) {
                log::debug!("{uri} not open, skipping didChange");
                return;
            }
            if inner.state != SessionState::Connected {
                log::warn!("cannot sync {uri}: session not connected");
                return;
            }
        }

        match self.transport.did_change(&uri, text, version).await {
            Ok(()) => {
                self.inner.write().await.registry.mark_changed(&uri, version);
            }
            Err(err) => log::warn!("didChange failed for {uri}: {err}"),
        }
    }

    /// Close a synchronized buffer and drop its cached diagnostics. No-op
    /// if the buffer is not open.
    pub async fn close_document(&self, buffer_id: &str) {
        let uri = document_uri(buffer_id);
        let lock = self.document_lock(&uri).await;
        {
            let _guard = lock.lock().await;

            // Removed from the open set first: whatever the transport
            // does, the document must not receive further change/close
            // calls.
            let was_open = self.inner.write().await.registry.mark_closed(&uri);
            if !was_open {
                log::debug!("{uri} not open, skipping didClose");
            } else if let Err(err) = self.transport.did_close(&uri).await {
                log::warn!("didClose failed for {uri}: {err}");
            }
        }
        drop(lock);

        // Prune the per-document lock once nobody else holds or awaits it,
        // so the lock map does not grow with every buffer ever touched.
        let mut locks = self.doc_locks.lock().await;
        if locks
            .get(&uri)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&uri);
        }
    }

    /// Query the symbol tree for a buffer. Errors when the session is not
    /// connected; an empty or `None` result is a normal "no usable symbol
    /// information" signal, not an error.
    pub async fn query_symbols(&self, buffer_id: &str) -> Result<Option<Vec<Symbol>>> {
        {
            let inner = self.inner.read().await;
            if inner.state != SessionState::Connected {
                return Err(SessionError::NotConnected);
            }
        }
        self.transport.document_symbols(&document_uri(buffer_id)).await
    }

    /// Status query passthrough to the external server.
    pub async fn server_status(&self) -> Result<ServerStatus> {
        self.transport.status().await
    }

    /// Server push: the process restarted and lost all document context.
    /// The open set and diagnostics cache are reset; open notifications
    /// must be re-issued by callers.
    pub async fn notify_restarted(&self) {
        let mut inner = self.inner.write().await;
        inner.registry.reset();
        inner.restart_count += 1;
        inner.state = SessionState::Connected;
        inner.last_error = None;
        log::info!(
            "language server restarted (count={}), document registry reset",
            inner.restart_count
        );
    }

    /// Server push: fatal failure. Reachable from any state; the session
    /// stops accepting queries immediately, in-flight requests are left to
    /// fail on their own. `start()` recovers from this state.
    pub async fn notify_failed(&self, message: &str) {
        let mut inner = self.inner.write().await;
        inner.state = SessionState::Failed;
        inner.last_error = Some(message.to_string());
        log::warn!("language server failed: {message}");
    }

    /// Server push: published diagnostics for a document. Cached only for
    /// documents currently open.
    pub async fn notify_diagnostics(&self, uri: &str, diagnostics: Value) {
        let mut inner = self.inner.write().await;
        if !inner.registry.store_diagnostics(uri, diagnostics) {
            log::debug!("dropping diagnostics for unopened {uri}");
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.read().await.state
    }

    pub async fn is_connected(&self) -> bool {
        self.inner.read().await.state == SessionState::Connected
    }

    pub async fn restart_count(&self) -> u32 {
        self.inner.read().await.restart_count
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.read().await.last_error.clone()
    }

    pub async fn is_document_open(&self, buffer_id: &str) -> bool {
        self.inner.read().await.registry.is_open(&document_uri(buffer_id))
    }

    pub async fn document_version(&self, buffer_id: &str) -> Option<i32> {
        self.inner.read().await.registry.version(&document_uri(buffer_id))
    }

    pub async fn open_document_count(&self) -> usize {
        self.inner.read().await.registry.open_count()
    }

    pub async fn diagnostics(&self, buffer_id: &str) -> Option<Value> {
        self.inner
            .read()
            .await
            .registry
            .diagnostics(&document_uri(buffer_id))
            .cloned()
    }

    async fn document_lock(&self, uri: &str) -> Arc<Mutex<()>> {
        let mut locks = self.doc_locks.lock().await;
        locks
            .entry(uri.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
