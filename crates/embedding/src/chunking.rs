/// Normalize extracted document text before chunking
///
/// Collapses every whitespace run to a single space, drops characters outside
/// printable ASCII and trims the result.
pub fn clean_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(' '..='~').contains(&c) {
            continue;
        }
        if pending_space && !cleaned.is_empty() {
            cleaned.push(' ');
        }
        pending_space = false;
        cleaned.push(c);
    }

    cleaned
}

/// Split text into word windows of `chunk_size` words
///
/// Consecutive windows share `overlap` words. The last window may be shorter.
/// An `overlap >= chunk_size` is clamped so the window always advances.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        start += step;
    }

    chunks
}

/// Clean then chunk a raw document
pub fn prepare_document(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    chunk_text(&clean_text(text), chunk_size, overlap)
}
