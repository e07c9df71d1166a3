use crate::types::{Chunk, ChunkKind, Symbol, SymbolKind};

/// Decompose a buffer using the symbol tree reported by the language server.
///
/// Walks top-level symbols in start-line order with a line cursor, emitting
/// gap chunks for uncovered spans, one chunk per top-level symbol, and one
/// `method` chunk per nested child right after its parent. Nested chunks are
/// annotated views over lines the parent already covers; they do not take
/// part in gap accounting. Malformed ranges are clamped to the buffer
/// instead of rejected, and a symbol overlapping an earlier one is clamped
/// to the cursor (or skipped when fully contained), so the coverage
/// contract holds for any input.
///
/// An empty symbol list turns the whole buffer into a single top-level
/// chunk; empty text produces no chunks.
#[must_use]
pub fn decompose(text: &str, symbols: &[Symbol]) -> Vec<Chunk> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }
    let last_line = lines.len() - 1;

    if symbols.is_empty() {
        log::debug!("no symbols reported, emitting whole buffer as one chunk");
        return vec![whole_buffer_chunk(&lines)];
    }

    // The server's own ordering is not trusted to be stable.
    let mut ordered: Vec<&Symbol> = symbols.iter().collect();
    ordered.sort_by_key(|symbol| symbol.start_line);

    let mut chunks = Vec::new();
    let mut last_end = 0usize;

    for symbol in ordered {
        let (start, end) = clamp_range(symbol, last_line);

        // Overlapping server output: lines before the cursor already
        // belong to an earlier symbol's chunk.
        if end < last_end {
            log::debug!(
                "skipping symbol {}: range fully consumed by an earlier symbol",
                symbol.name
            );
            continue;
        }
        let start = start.max(last_end);

        if start > last_end {
            if let Some(gap) = gap_chunk(&lines, last_end, start) {
                chunks.push(gap);
            }
        }

        chunks.push(symbol_chunk(&lines, symbol, start, end));

        // One nesting level only: grandchildren are not recursed.
        for child in &symbol.children {
            let (child_start, child_end) = clamp_range(child, last_line);
            let qualified = format!("{}.{}", symbol.name, child.name);
            chunks.push(Chunk {
                id: format!("method:{qualified}"),
                content: lines[child_start..=child_end].join("\n"),
                symbol_name: Some(qualified),
                kind: ChunkKind::Method,
                start_line: child_start,
                end_line: child_end,
            });
        }

        last_end = last_end.max(end + 1);
    }

    if last_end <= last_line {
        if let Some(gap) = gap_chunk(&lines, last_end, last_line + 1) {
            chunks.push(gap);
        }
    }

    chunks
}

/// Clamp a symbol's range to `[0, last_line]`; `end < start` collapses to
/// the start line rather than erroring.
fn clamp_range(symbol: &Symbol, last_line: usize) -> (usize, usize) {
    let start = symbol.start_line.min(last_line);
    let end = symbol.end_line.min(last_line).max(start);
    (start, end)
}

fn symbol_chunk(lines: &[&str], symbol: &Symbol, start: usize, end: usize) -> Chunk {
    let kind = ChunkKind::from(symbol.kind);
    let id = if symbol.kind == SymbolKind::Other {
        format!("toplevel:{start}")
    } else {
        format!("{}:{}", kind.as_str(), symbol.name)
    };

    Chunk {
        id,
        content: lines[start..=end].join("\n"),
        symbol_name: Some(symbol.name.clone()),
        kind,
        start_line: start,
        end_line: end,
    }
}

/// Emit a top-level chunk for the uncovered span `[from, to)`, trimming
/// surrounding blank lines. Whitespace-only spans produce no chunk.
pub(crate) fn gap_chunk(lines: &[&str], from: usize, to: usize) -> Option<Chunk> {
    let mut start = from;
    let mut end = to;

    while start < end && lines[start].trim().is_empty() {
        start += 1;
    }
    while end > start && lines[end - 1].trim().is_empty() {
        end -= 1;
    }
    if start == end {
        return None;
    }

    Some(Chunk {
        id: format!("toplevel:{start}"),
        content: lines[start..end].join("\n"),
        symbol_name: None,
        kind: ChunkKind::TopLevel,
        start_line: start,
        end_line: end - 1,
    })
}

pub(crate) fn whole_buffer_chunk(lines: &[&str]) -> Chunk {
    Chunk {
        id: "toplevel:0".to_string(),
        content: lines.join("\n"),
        symbol_name: None,
        kind: ChunkKind::TopLevel,
        start_line: 0,
        end_line: lines.len() - 1,
    }
}
