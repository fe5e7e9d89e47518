use std::io::BufRead;
use std::path::Path;

use crate::error::{IkcError, IkcResult};

/// Parses a tab-separated edge list: two non-negative integers per
/// non-empty line, trailing whitespace ignored, `#`-prefixed lines are
/// comments. Self-loops and duplicate edges are not filtered here; the
/// graph store silently drops those on insertion.
pub fn parse_edges(reader: impl BufRead) -> IkcResult<Vec<(u64, u64)>> {
    let mut edges = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let text = line.trim_end();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let mut parts = text.split('\t');
        let (Some(u), Some(v), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(IkcError::MalformedEdgeLine {
                line_no,
                text: line,
            });
        };
        let (Ok(u), Ok(v)) = (u.parse::<u64>(), v.parse::<u64>()) else {
            return Err(IkcError::MalformedEdgeLine {
                line_no,
                text: line,
            });
        };
        edges.push((u, v));
    }
    Ok(edges)
}

/// Opens and parses an edge-list file at `path`.
pub fn load_edges_from_path(path: impl AsRef<Path>) -> IkcResult<Vec<(u64, u64)>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|_| IkcError::InputFileNotFound(path.display().to_string()))?;
    parse_edges(std::io::BufReader::new(file))
}
