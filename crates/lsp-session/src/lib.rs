//! # Chunk LSP Session
//!
//! Manages the connection to the external language-intelligence server and
//! the set of text buffers synchronized with it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   SessionManager                     │
//! │  connectivity state, restart counter, last error     │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │              DocumentRegistry                  │  │
//! │  │  open set, version counters, diagnostics cache │  │
//! │  └────────────────────────────────────────────────┘  │
//! │  per-document locks (open → change* → close order)   │
//! └───────────────────────┬──────────────────────────────┘
//!                         │
//!                 LanguageServer trait
//!        (injected transport, wire encoding elsewhere)
//! ```
//!
//! The transport is a black box injected behind the [`LanguageServer`]
//! trait: process supervision and wire encoding live below it. The manager
//! owns all shared mutable state; server push signals (restarted, failed,
//! diagnostics) arrive through `notify_*` methods on the manager.

mod error;
mod registry;
mod session;
mod transport;

pub use error::{Result, SessionError};
pub use registry::DocumentRegistry;
pub use session::{document_uri, SessionManager, SessionState};
pub use transport::{LanguageServer, ServerStatus};
