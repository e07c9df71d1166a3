//! # Chunk Decomposer
//!
//! Splits a source buffer into self-contained chunks (functions, classes,
//! methods, top-level statements) suitable for independent embedding and
//! indexing.
//!
//! Two decomposition paths share one output contract:
//!
//! ```text
//! Buffer text ──┬──> Symbol decomposition (server-reported symbol tree)
//!               │       ├─> sort symbols, walk with a line cursor
//!               │       ├─> emit gap chunks for uncovered spans
//!               │       └─> emit nested method chunks after their parent
//!               │
//!               └──> Fallback decomposition (no server required)
//!                       ├─> zero-indentation definition detection
//!                       └─> same gap-filling contract
//! ```
//!
//! Both paths guarantee: every line of a non-empty buffer lands in exactly
//! one top-level chunk (whitespace-only gaps are dropped), chunk ids are
//! deterministic, and identical input produces byte-identical output.
//!
//! ## Example
//!
//! ```rust
//! use chunk_decomposer::{decompose, Symbol, SymbolKind};
//!
//! let text = "def greet():\n    print('hi')\n";
//! let symbols = vec![Symbol::new("greet", SymbolKind::Function, 0, 1)];
//!
//! let chunks = decompose(text, &symbols);
//! assert_eq!(chunks[0].id, "function:greet");
//! ```

mod decompose;
mod fallback;
mod types;

pub use decompose::decompose;
pub use fallback::decompose_fallback;
pub use types::{Chunk, ChunkKind, Symbol, SymbolKind};
