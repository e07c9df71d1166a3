use crate::decompose::{gap_chunk, whole_buffer_chunk};
use crate::types::{Chunk, ChunkKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Zero-indentation definition patterns, one capture group for the name.
/// Covers the definition syntaxes of the languages the pipeline indexes.
static DEFINITION_PATTERNS: Lazy<Vec<(Regex, ChunkKind)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"^(?:async\s+)?def\s+([A-Za-z_]\w*)").unwrap(),
            ChunkKind::Function,
        ),
        (
            Regex::new(r"^(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?(?:unsafe\s+)?fn\s+([A-Za-z_]\w*)")
                .unwrap(),
            ChunkKind::Function,
        ),
        (
            Regex::new(r"^(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)")
                .unwrap(),
            ChunkKind::Function,
        ),
        (
            Regex::new(r"^(?:export\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)").unwrap(),
            ChunkKind::Class,
        ),
    ]
});

/// What the scanner is currently accumulating
enum Open {
    Definition {
        kind: ChunkKind,
        name: String,
        start: usize,
    },
    TopLevel {
        start: usize,
    },
}

/// Heuristic decomposition used when the language server is unavailable or
/// reports no usable symbols.
///
/// Scans lines sequentially. A zero-indentation line matching a function or
/// class definition pattern opens a new chunk and closes the previous one at
/// the line before. Zero-indentation code that matches no pattern
/// accumulates into top-level chunks, so the output honors the same
/// full-coverage contract as symbol decomposition. A buffer with no
/// detected definitions comes back as one top-level chunk; empty input
/// produces no chunks.
#[must_use]
pub fn decompose_fallback(text: &str) -> Vec<Chunk> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut open: Option<Open> = None;
    let mut saw_definition = false;

    for (idx, line) in lines.iter().enumerate() {
        let zero_indent = !line.starts_with(' ') && !line.starts_with('\t');

        if zero_indent {
            if let Some((kind, name)) = match_definition(line) {
                flush(&mut chunks, &lines, open.take(), idx);
                open = Some(Open::Definition {
                    kind,
                    name,
                    start: idx,
                });
                saw_definition = true;
                continue;
            }

            // A dedented non-definition line ends the current definition
            // body. Closing delimiters still belong to it.
            if !line.trim().is_empty()
                && !matches!(line.chars().next(), Some('}' | ')' | ']'))
                && matches!(open, Some(Open::Definition { .. }))
            {
                flush(&mut chunks, &lines, open.take(), idx);
                open = Some(Open::TopLevel { start: idx });
                continue;
            }
        }

        if open.is_none() && !line.trim().is_empty() {
            open = Some(Open::TopLevel { start: idx });
        }
    }
    flush(&mut chunks, &lines, open.take(), lines.len());

    if !saw_definition {
        log::debug!("no top-level definitions detected, emitting whole buffer as one chunk");
        return vec![whole_buffer_chunk(&lines)];
    }

    chunks
}

fn match_definition(line: &str) -> Option<(ChunkKind, String)> {
    for (pattern, kind) in DEFINITION_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(line) {
            if let Some(name) = captures.get(1) {
                return Some((*kind, name.as_str().to_string()));
            }
        }
    }
    None
}

/// Close the currently open chunk at `end` (exclusive), trimming trailing
/// blank lines. Top-level accumulations reuse the gap-chunk trimming rule.
fn flush(chunks: &mut Vec<Chunk>, lines: &[&str], open: Option<Open>, end: usize) {
    match open {
        None => {}
        Some(Open::TopLevel { start }) => {
            if let Some(chunk) = gap_chunk(lines, start, end) {
                chunks.push(chunk);
            }
        }
        Some(Open::Definition { kind, name, start }) => {
            let mut trimmed_end = end;
            while trimmed_end > start + 1 && lines[trimmed_end - 1].trim().is_empty() {
                trimmed_end -= 1;
            }
            chunks.push(Chunk {
                id: format!("{}:{}", kind.as_str(), name),
                content: lines[start..trimmed_end].join("\n"),
                symbol_name: Some(name),
                kind,
                start_line: start,
                end_line: trimmed_end - 1,
            });
        }
    }
}
