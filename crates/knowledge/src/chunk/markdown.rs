//! Header-aware markdown chunking.

use super::{char_len, ChunkConfig, ChunkText, Chunker};

/// Sentence endings tried, in order, when cutting an oversized paragraph.
const SENTENCE_ENDINGS: [[char; 2]; 6] = [
    ['.', ' '],
    ['.', '\n'],
    ['!', ' '],
    ['!', '\n'],
    ['?', ' '],
    ['?', '\n'],
];

/// Splits markdown on `#`..`######` headings.
///
/// Sections longer than the chunk size are split on blank lines; single
/// paragraphs that are still too long fall back to character windows that
/// prefer to end on a sentence boundary. Continuation chunks repeat the
/// section heading.
#[derive(Debug, Clone)]
pub struct MarkdownChunker {
    config: ChunkConfig,
}

impl Default for MarkdownChunker {
    fn default() -> Self {
        Self::new(ChunkConfig::markdown())
    }
}

/// Heading level if the line is an ATX heading (`#` x 1..=6 then whitespace).
fn heading_level(line: &str) -> Option<usize> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    match line[level..].chars().next() {
        Some(c) if c.is_whitespace() => Some(level),
        _ => None,
    }
}

struct Section {
    header: Option<String>,
    heading_path: Vec<String>,
    lines: Vec<String>,
}

impl MarkdownChunker {
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    fn split_sections(text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut stack: Vec<(usize, String)> = Vec::new();
        let mut current = Section {
            header: None,
            heading_path: Vec::new(),
            lines: Vec::new(),
        };

        for line in text.split('\n') {
            if let Some(level) = heading_level(line) {
                if !current.lines.is_empty() {
                    sections.push(current);
                }

                let header = line.trim().to_string();
                stack.retain(|(l, _)| *l < level);
                stack.push((level, header.clone()));

                current = Section {
                    header: Some(header),
                    heading_path: stack.iter().map(|(_, h)| h.clone()).collect(),
                    lines: vec![line.to_string()],
                };
            } else {
                current.lines.push(line.to_string());
            }
        }

        if !current.lines.is_empty() {
            sections.push(current);
        }

        sections
    }

    fn chunk_section(&self, section_text: &str, header: Option<&str>) -> Vec<String> {
        let size = self.config.chunk_size;

        if char_len(section_text) <= size {
            return vec![section_text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut current = String::new();

        for para in section_text.split("\n\n") {
            if char_len(&current) + char_len(para) + 2 > size {
                let trimmed = current.trim();
                if !trimmed.is_empty() && Some(trimmed) != header {
                    chunks.push(trimmed.to_string());
                }
                current = header.map(|h| format!("{}\n\n", h)).unwrap_or_default();

                if char_len(para) > size {
                    chunks.extend(self.split_large_paragraph(para, header));
                } else {
                    current.push_str(para);
                    current.push_str("\n\n");
                }
            } else {
                current.push_str(para);
                current.push_str("\n\n");
            }
        }

        let trimmed = current.trim();
        if !trimmed.is_empty() && Some(trimmed) != header {
            chunks.push(trimmed.to_string());
        }

        chunks
    }

    fn split_large_paragraph(&self, paragraph: &str, header: Option<&str>) -> Vec<String> {
        let chars: Vec<char> = paragraph.chars().collect();
        let total = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total {
            let prefix = match header {
                Some(h) if start > 0 => format!("{}\n\n", h),
                _ => String::new(),
            };
            let budget = self
                .config
                .chunk_size
                .saturating_sub(char_len(&prefix))
                .max(1);
            let end = (start + budget).min(total);

            let mut window = &chars[start..end];
            if end < total {
                if let Some(cut) = sentence_cut(window) {
                    window = &chars[start..start + cut + 1];
                }
            }

            let body: String = window.iter().collect();
            chunks.push(format!("{}{}", prefix, body).trim().to_string());

            if start + window.len() >= total {
                break;
            }
            start += window.len().saturating_sub(self.config.overlap).max(1);
        }

        chunks
    }
}

/// Index of the first matching sentence ending that lies in the latter
/// half of the window.
fn sentence_cut(window: &[char]) -> Option<usize> {
    let half = window.len() as f64 * 0.5;

    SENTENCE_ENDINGS.iter().find_map(|ending| {
        window
            .windows(2)
            .rposition(|pair| pair == ending)
            .filter(|pos| *pos as f64 > half)
    })
}

impl Chunker for MarkdownChunker {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn split(&self, text: &str) -> Vec<ChunkText> {
        let mut pieces = Vec::new();

        for section in Self::split_sections(text) {
            let section_text = section.lines.join("\n");
            let section_text = section_text.trim();
            if section_text.is_empty() {
                continue;
            }

            for chunk in self.chunk_section(section_text, section.header.as_deref()) {
                pieces.push(ChunkText {
                    text: chunk,
                    heading_path: section.heading_path.clone(),
                });
            }
        }

        pieces
    }
}
