use crate::error::Result;
use async_trait::async_trait;
use chunk_decomposer::Symbol;
use serde::{Deserialize, Serialize};

/// Server status as reported by the external process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Server process is running
    pub running: bool,
    /// Server finished its initialization handshake
    pub initialized: bool,
    /// Number of times the server was restarted
    pub restart_count: u32,
}

/// Injected transport to the external language-intelligence server.
///
/// Implementations own the wire encoding and process plumbing; the session
/// layer only sequences calls and tracks state. Document sync is
/// full-replacement: `did_change` carries the complete new text, never a
/// diff.
#[async_trait]
pub trait LanguageServer: Send + Sync {
    /// Perform the connection/initialization handshake.
    async fn initialize(&self) -> Result<()>;

    /// Tear the connection down. Best-effort; errors are logged upstream.
    async fn shutdown(&self) -> Result<()>;

    /// Document-open notification.
    async fn did_open(&self, uri: &str, text: &str, version: i32) -> Result<()>;

    /// Document-change notification with full replacement text.
    async fn did_change(&self, uri: &str, text: &str, version: i32) -> Result<()>;

    /// Document-close notification.
    async fn did_close(&self, uri: &str) -> Result<()>;

    /// Symbol query round trip. `None` means the server had nothing to
    /// report, which callers treat as "no usable symbol information".
    async fn document_symbols(&self, uri: &str) -> Result<Option<Vec<Symbol>>>;

    /// Status query round trip.
    async fn status(&self) -> Result<ServerStatus>;
}
