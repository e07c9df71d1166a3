use serde::{Deserialize, Serialize};

/// Coarse classification of a server-reported symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Class definition
    Class,
    /// Method inside a class
    Method,
    /// Standalone function
    Function,
    /// Anything the server reports that is none of the above
    Other,
}

impl SymbolKind {
    /// Parse the server's kind string (case-insensitive, unknown -> Other)
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "class" => Self::Class,
            "method" => Self::Method,
            "function" => Self::Function,
            _ => Self::Other,
        }
    }
}

/// A named code element reported by the language-intelligence server.
///
/// Symbols are read-only projections of the server response; the decomposer
/// never mutates them. Line numbers are 0-indexed, end inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "wire::Symbol")]
pub struct Symbol {
    /// Symbol name as reported by the server
    pub name: String,

    /// Coarse kind classification
    pub kind: SymbolKind,

    /// First line of the symbol (0-indexed)
    pub start_line: usize,

    /// Last line of the symbol (0-indexed, inclusive)
    pub end_line: usize,

    /// Nested child symbols (methods within a class)
    pub children: Vec<Symbol>,
}

impl Symbol {
    /// Create a symbol without children
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SymbolKind, start_line: usize, end_line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            start_line,
            end_line,
            children: Vec::new(),
        }
    }

    /// Builder: attach nested children
    #[must_use]
    pub fn with_children(mut self, children: Vec<Symbol>) -> Self {
        self.children = children;
        self
    }
}

/// Wire shape of the server's symbol response:
/// `{name, kind, range: {start: {line}, end: {line}}, children?}`
mod wire {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Symbol {
        pub name: String,
        pub kind: String,
        pub range: Range,
        #[serde(default)]
        pub children: Vec<Symbol>,
    }

    #[derive(Deserialize)]
    pub struct Range {
        pub start: Position,
        pub end: Position,
    }

    #[derive(Deserialize)]
    pub struct Position {
        pub line: usize,
    }
}

impl From<wire::Symbol> for Symbol {
    fn from(raw: wire::Symbol) -> Self {
        Self {
            name: raw.name,
            kind: SymbolKind::parse(&raw.kind),
            start_line: raw.range.start.line,
            end_line: raw.range.end.line,
            children: raw.children.into_iter().map(Symbol::from).collect(),
        }
    }
}

/// Kind of an emitted chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Standalone function
    Function,
    /// Class definition
    Class,
    /// Method inside a class
    Method,
    /// Gap text or unclassified top-level code
    TopLevel,
}

impl ChunkKind {
    /// Chunk-id prefix for this kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::TopLevel => "toplevel",
        }
    }
}

impl From<SymbolKind> for ChunkKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Class => Self::Class,
            SymbolKind::Method => Self::Method,
            SymbolKind::Function => Self::Function,
            SymbolKind::Other => Self::TopLevel,
        }
    }
}

/// A contiguous slice of source text treated as an independent unit for
/// downstream indexing.
///
/// Immutable value object. Ids are deterministic from kind, name, and start
/// line, so re-chunking identical content yields identical ids. Serializes
/// to the downstream record shape
/// `{chunkId, content, symbolName, symbolType, startLine, endLine}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Identifier scoped to the buffer: `toplevel:<startLine>`,
    /// `<kind>:<name>`, or `method:<parent>.<child>`
    #[serde(rename = "chunkId")]
    pub id: String,

    /// Literal text of the covered lines
    pub content: String,

    /// Symbol name, absent for gap/top-level chunks
    pub symbol_name: Option<String>,

    /// Chunk kind
    #[serde(rename = "symbolType")]
    pub kind: ChunkKind,

    /// First covered line (0-indexed)
    pub start_line: usize,

    /// Last covered line (0-indexed, inclusive)
    pub end_line: usize,
}

impl Chunk {
    /// Number of lines covered by this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}
