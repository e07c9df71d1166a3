//! # Chunk Extractor
//!
//! Facade over the session layer and the decomposers: given a buffer's
//! text, produce the ordered chunk list for downstream indexing.
//!
//! ```text
//! extract(buffer_id, text)
//!     │
//!     ├─ session connected?
//!     │      │
//!     │      ├─ yes: scoped open (skip if already open)
//!     │      │        └─> query symbols ──> symbol decomposition
//!     │      │            └─ close again iff opened here
//!     │      │
//!     │      └─ no ──────────────────────> fallback decomposition
//!     │
//!     └─ any failure or empty symbol set ─> fallback decomposition
//! ```
//!
//! Extraction never fails from the caller's perspective; the only visible
//! degenerate case is empty input producing an empty chunk list.

mod extract;

pub use extract::ChunkExtractor;
