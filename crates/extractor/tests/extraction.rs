//! End-to-end facade behavior against a scripted transport: symbol-driven
//! decomposition when the server cooperates, fallback otherwise, and the
//! scoped open/close discipline in both success and failure paths.

use async_trait::async_trait;
use chunk_decomposer::{ChunkKind, Symbol, SymbolKind};
use chunk_extractor::ChunkExtractor;
use chunk_lsp_session::{LanguageServer, Result, ServerStatus, SessionError, SessionManager};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const BUFFER: &str = "\
import os

def compute():
    return os.cpu_count()

print(compute())";

#[derive(Default)]
struct ScriptedServer {
    events: Mutex<Vec<String>>,
    symbols: Mutex<Option<Vec<Symbol>>>,
    fail_symbols: AtomicBool,
}

impl ScriptedServer {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }
}

#[async_trait]
impl LanguageServer for ScriptedServer {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, uri: &str, _text: &str, _version: i32) -> Result<()> {
        self.record(format!("open {uri}"));
        Ok(())
    }

    async fn did_change(&self, uri: &str, _text: &str, _version: i32) -> Result<()> {
        self.record(format!("change {uri}"));
        Ok(())
    }

    async fn did_close(&self, uri: &str) -> Result<()> {
        self.record(format!("close {uri}"));
        Ok(())
    }

    async fn document_symbols(&self, _uri: &str) -> Result<Option<Vec<Symbol>>> {
        if self.fail_symbols.load(Ordering::SeqCst) {
            return Err(SessionError::transport("symbol query timed out"));
        }
        Ok(self.symbols.lock().unwrap().clone())
    }

    async fn status(&self) -> Result<ServerStatus> {
        Ok(ServerStatus {
            running: true,
            initialized: true,
            restart_count: 0,
        })
    }
}

fn extractor() -> (Arc<ScriptedServer>, ChunkExtractor) {
    let server = Arc::new(ScriptedServer::default());
    let session = Arc::new(SessionManager::new(server.clone()));
    (server, ChunkExtractor::new(session))
}

#[tokio::test]
async fn symbol_decomposition_with_scoped_open_and_close() {
    let (server, extractor) = extractor();
    *server.symbols.lock().unwrap() =
        Some(vec![Symbol::new("compute", SymbolKind::Function, 2, 3)]);
    extractor.session().start().await.unwrap();

    let chunks = extractor.extract("node-1", BUFFER).await;

    let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["toplevel:0", "function:compute", "toplevel:5"]);

    // Opened for this call only, so closed again afterwards.
    assert_eq!(
        server.events(),
        vec!["open buffer://node-1", "close buffer://node-1"]
    );
    assert!(!extractor.session().is_document_open("node-1").await);
}

#[tokio::test]
async fn query_failure_falls_back_and_still_closes() {
    let (server, extractor) = extractor();
    server.fail_symbols.store(true, Ordering::SeqCst);
    extractor.session().start().await.unwrap();

    let chunks = extractor.extract("node-1", BUFFER).await;

    // Fallback still finds the function heuristically.
    assert!(chunks.iter().any(|c| c.id == "function:compute"));
    assert_eq!(
        server.events(),
        vec!["open buffer://node-1", "close buffer://node-1"]
    );
    assert!(!extractor.session().is_document_open("node-1").await);
}

#[tokio::test]
async fn already_open_document_is_left_open() {
    let (server, extractor) = extractor();
    *server.symbols.lock().unwrap() =
        Some(vec![Symbol::new("compute", SymbolKind::Function, 2, 3)]);
    let session = extractor.session().clone();
    session.start().await.unwrap();
    session.open_document("node-1", BUFFER, 1).await;

    let chunks = extractor.extract("node-1", BUFFER).await;
    assert!(!chunks.is_empty());

    // One open from the editor, no close from the extractor.
    assert_eq!(server.events(), vec!["open buffer://node-1"]);
    assert!(session.is_document_open("node-1").await);
}

#[tokio::test]
async fn disconnected_session_uses_fallback_without_transport_calls() {
    let (server, extractor) = extractor();

    let chunks = extractor.extract("node-1", BUFFER).await;

    assert!(chunks.iter().any(|c| c.id == "function:compute"));
    assert!(server.events().is_empty());
}

#[tokio::test]
async fn empty_symbol_list_uses_fallback() {
    let (server, extractor) = extractor();
    *server.symbols.lock().unwrap() = Some(Vec::new());
    extractor.session().start().await.unwrap();

    let chunks = extractor.extract("node-1", "x = 1\ny = 2").await;

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].id, "toplevel:0");
    assert_eq!(chunks[0].kind, ChunkKind::TopLevel);
    assert_eq!(chunks[0].content, "x = 1\ny = 2");
}

#[tokio::test]
async fn null_symbol_result_uses_fallback() {
    let (server, extractor) = extractor();
    *server.symbols.lock().unwrap() = None;
    extractor.session().start().await.unwrap();

    let chunks = extractor.extract("node-1", BUFFER).await;
    assert!(chunks.iter().any(|c| c.id == "function:compute"));
}

#[tokio::test]
async fn empty_input_produces_no_chunks() {
    let (_server, extractor) = extractor();
    extractor.session().start().await.unwrap();

    assert!(extractor.extract("node-1", "").await.is_empty());
}

#[tokio::test]
async fn repeated_extraction_is_deterministic() {
    let (server, extractor) = extractor();
    *server.symbols.lock().unwrap() =
        Some(vec![Symbol::new("compute", SymbolKind::Function, 2, 3)]);
    extractor.session().start().await.unwrap();

    let first = extractor.extract("node-1", BUFFER).await;
    let second = extractor.extract("node-1", BUFFER).await;
    assert_eq!(first, second);
}
