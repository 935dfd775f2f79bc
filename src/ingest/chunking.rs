/// Chunk size and overlap, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            chunk_chars: 1024,
            overlap_chars: 128,
        }
    }
}

/// Splits `text` into chunks of at most `chunk_chars` characters.
///
/// Chunks end at the last whitespace in the back half of the window when there is one,
/// and consecutive chunks share up to `overlap` characters. Whitespace-only chunks are
/// dropped and every chunk is trimmed.
pub fn chunk_text(text: &str, chunk_chars: usize, overlap: usize) -> Vec<String> {
    let chunk_chars = chunk_chars.max(1);
    let overlap = overlap.min(chunk_chars - 1);
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let mut end = (start + chunk_chars).min(total);

        if end < total {
            let floor = start + chunk_chars / 2;
            if let Some(brk) = (floor.max(start + 1)..end)
                .rev()
                .find(|&i| chars[i].is_whitespace())
            {
                end = brk;
            }
        }

        let chunk: String = chars[start..end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end >= total {
            break;
        }

        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { end };
    }

    chunks
}
