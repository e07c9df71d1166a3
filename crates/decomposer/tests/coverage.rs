//! Full-coverage contract shared by both decomposition paths: sorted by
//! start line, top-level chunks partition the buffer with no overlaps, and
//! the only uncovered lines are blank ones trimmed from gap edges.

use chunk_decomposer::{decompose, decompose_fallback, Chunk, ChunkKind, Symbol, SymbolKind};

fn assert_full_coverage(text: &str, chunks: &[Chunk]) {
    let lines: Vec<&str> = text.lines().collect();
    let mut covered = vec![false; lines.len()];

    let mut top_level: Vec<&Chunk> = chunks
        .iter()
        .filter(|chunk| chunk.kind != ChunkKind::Method)
        .collect();
    top_level.sort_by_key(|chunk| chunk.start_line);

    for chunk in top_level {
        for line in chunk.start_line..=chunk.end_line {
            assert!(
                !covered[line],
                "line {line} covered twice in {:?}",
                chunk.id
            );
            covered[line] = true;
        }
    }

    for (idx, line) in lines.iter().enumerate() {
        if !covered[idx] {
            assert!(
                line.trim().is_empty(),
                "non-blank line {idx} ({line:?}) not covered by any chunk"
            );
        }
    }
}

#[test]
fn symbol_path_covers_every_buffer() {
    let text = "\
import sys

def a():
    return 1


def b():
    return 2

if __name__ == '__main__':
    a()";

    let cases: Vec<Vec<Symbol>> = vec![
        vec![],
        vec![Symbol::new("a", SymbolKind::Function, 2, 3)],
        vec![
            Symbol::new("a", SymbolKind::Function, 2, 3),
            Symbol::new("b", SymbolKind::Function, 6, 7),
        ],
        // Deliberately malformed ranges.
        vec![Symbol::new("broken", SymbolKind::Function, 8, 2)],
        vec![Symbol::new("oob", SymbolKind::Class, 3, 500)],
    ];

    for symbols in cases {
        let chunks = decompose(text, &symbols);
        assert!(!chunks.is_empty());
        assert_full_coverage(text, &chunks);
    }
}

#[test]
fn fallback_path_covers_every_buffer() {
    let inputs = [
        "def a():\n    pass\n\ndef b():\n    pass\n",
        "x = 1\ny = 2",
        "fn main() {\n    run();\n}\n\nconst X: u8 = 1;\n",
        "class A:\n    pass\nclass B:\n    pass",
        "   \n\nonly indented\n",
    ];

    for text in inputs {
        let chunks = decompose_fallback(text);
        assert!(!chunks.is_empty(), "non-empty input must produce chunks");
        assert_full_coverage(text, &chunks);
    }
}

#[test]
fn overlapping_symbols_keep_the_partition() {
    let text = (0..20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");

    let cases: Vec<Vec<Symbol>> = vec![
        // Partial overlap.
        vec![
            Symbol::new("a", SymbolKind::Function, 0, 10),
            Symbol::new("b", SymbolKind::Function, 5, 15),
        ],
        // One symbol fully inside another.
        vec![
            Symbol::new("a", SymbolKind::Function, 0, 15),
            Symbol::new("b", SymbolKind::Function, 5, 10),
        ],
        // Duplicate ranges.
        vec![
            Symbol::new("a", SymbolKind::Function, 0, 10),
            Symbol::new("b", SymbolKind::Function, 0, 10),
        ],
    ];

    for symbols in cases {
        let chunks = decompose(&text, &symbols);
        assert!(!chunks.is_empty());
        assert_full_coverage(&text, &chunks);
    }
}

#[test]
fn nested_methods_do_not_break_top_level_partition() {
    let text = (0..30).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let class = Symbol::new("Big", SymbolKind::Class, 5, 25).with_children(vec![
        Symbol::new("one", SymbolKind::Method, 7, 10),
        Symbol::new("two", SymbolKind::Method, 12, 20),
    ]);

    let chunks = decompose(&text, &[class]);
    assert_full_coverage(&text, &chunks);
    assert_eq!(
        chunks
            .iter()
            .filter(|chunk| chunk.kind == ChunkKind::Method)
            .count(),
        2
    );
}
