//! Document chunking for embedding

/// Default chunk size in characters
pub const CHUNK_SIZE_CHARS: usize = 1000;
/// Default overlap between consecutive chunks
pub const CHUNK_OVERLAP_CHARS: usize = 150;

/// A passage of the loaded course material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// Byte offset in the source text
    pub position: usize,
}

/// Find a valid char boundary at or before the given byte index
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Find a valid char boundary at or after the given byte index
fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Split on paragraph or sentence breaks near the chunk size
pub fn chunk_by_chars(content: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1);
    if content.trim().is_empty() {
        return Vec::new();
    }
    if content.len() <= chunk_size {
        return vec![Chunk {
            text: content.to_string(),
            position: 0,
        }];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < content.len() {
        let raw_end = (start + chunk_size).min(content.len());
        let mut end = floor_char_boundary(content, raw_end);
        if end <= start {
            // chunk smaller than one character
            end = ceil_char_boundary(content, start + 1);
        }
        let mut chunk_end = end;

        // Prefer a natural break in the last 30%
        if end < content.len() {
            let search_start = ceil_char_boundary(content, start + (chunk_size * 70 / 100));

            if search_start < end {
                let region = &content[search_start..end];

                if let Some(pos) = region.rfind("\n\n") {
                    chunk_end = search_start + pos + 2;
                } else if let Some(pos) = region.rfind(". ") {
                    chunk_end = search_start + pos + 2;
                } else if let Some(pos) = region.rfind('\n') {
                    chunk_end = search_start + pos + 1;
                } else if let Some(pos) = region.rfind(' ') {
                    chunk_end = search_start + pos + 1;
                }
            }
        }

        chunks.push(Chunk {
            text: content[start..chunk_end].to_string(),
            position: start,
        });

        if chunk_end >= content.len() {
            break;
        }

        let next = ceil_char_boundary(content, chunk_end.saturating_sub(overlap));
        start = if next > start { next } else { chunk_end };
    }

    chunks
}
