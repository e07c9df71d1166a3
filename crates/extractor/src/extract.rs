use chunk_decomposer::{decompose, decompose_fallback, Chunk, Symbol};
use chunk_lsp_session::{Result, SessionError, SessionManager};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Scoped document acquisition: opens the buffer for the duration of one
/// extraction and guarantees it is closed again on every exit path, but
/// only if it was opened here. A buffer that was already open (the active
/// editor buffer, say) is never closed as a side effect of chunking.
struct ScopedDocument<'a> {
    session: &'a SessionManager,
    buffer_id: &'a str,
    opened_here: bool,
}

impl<'a> ScopedDocument<'a> {
    async fn acquire(
        session: &'a SessionManager,
        buffer_id: &'a str,
        text: &str,
        version: i32,
    ) -> ScopedDocument<'a> {
        let opened_here = if session.is_document_open(buffer_id).await {
            false
        } else {
            session.open_document(buffer_id, text, version).await;
            // Open fails silently on a dead session; only a document we
            // actually opened must be closed on the way out.
            session.is_document_open(buffer_id).await
        };
        Self {
            session,
            buffer_id,
            opened_here,
        }
    }

    async fn release(self) {
        if self.opened_here {
            self.session.close_document(self.buffer_id).await;
        }
    }
}

/// Produces ordered, fully covering chunk lists for source buffers.
///
/// When the session is connected the extractor synchronizes the buffer,
/// queries the server's symbol tree, and decomposes along symbol
/// boundaries. Whenever that path yields nothing usable (disconnected
/// session, query failure, empty symbol list) it degrades to the
/// self-contained heuristic decomposer. Decomposition is atomic: the
/// caller always receives a complete list or a complete fallback, never a
/// partial mix. The symbol query runs on its own task, so a caller that
/// tears down mid-call leaves the round trip to finish for session-state
/// consistency; the discarded result is never applied.
pub struct ChunkExtractor {
    session: Arc<SessionManager>,
    next_version: AtomicI32,
}

impl ChunkExtractor {
    #[must_use]
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            next_version: AtomicI32::new(1),
        }
    }

    /// Decompose `text` into chunks. Infallible: empty input is the only
    /// case that produces an empty list.
    pub async fn extract(&self, buffer_id: &str, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        if !self.session.is_connected().await {
            log::debug!("session not connected, using fallback decomposition for {buffer_id}");
            return decompose_fallback(text);
        }

        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        let document = ScopedDocument::acquire(&self.session, buffer_id, text, version).await;
        let result = self.query_symbols_detached(buffer_id).await;
        document.release().await;

        match result {
            Ok(Some(symbols)) if !symbols.is_empty() => decompose(text, &symbols),
            Ok(_) => {
                log::debug!("no symbols for {buffer_id}, using fallback decomposition");
                decompose_fallback(text)
            }
            Err(err) => {
                log::warn!("symbol query failed for {buffer_id}: {err}, using fallback");
                decompose_fallback(text)
            }
        }
    }

    /// Run the symbol query on its own task. If the surrounding extraction
    /// is dropped mid-call, the round trip still completes against the
    /// server and only the result is thrown away.
    async fn query_symbols_detached(&self, buffer_id: &str) -> Result<Option<Vec<Symbol>>> {
        let session = Arc::clone(&self.session);
        let id = buffer_id.to_string();
        match tokio::spawn(async move { session.query_symbols(&id).await }).await {
            Ok(result) => result,
            Err(err) => Err(SessionError::transport(format!(
                "symbol query task aborted: {err}"
            ))),
        }
    }

    /// The session this extractor queries.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }
}
