//! Source document discovery and loading.

use mentor_core::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    PlainText,
    Unsupported,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("md") | Some("markdown") => Self::Markdown,
            Some("txt") => Self::PlainText,
            _ => Self::Unsupported,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::PlainText => "text",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Expand files and directories into the sorted list of ingestible files.
///
/// A path that does not exist is a configuration error; unsupported files
/// inside directories are skipped.
pub fn collect_documents(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for path in paths {
        if path.is_file() {
            documents.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file()
                    && ContentType::from_path(entry_path) != ContentType::Unsupported
                {
                    documents.push(entry_path.to_path_buf());
                }
            }
        } else {
            return Err(AppError::Config(format!(
                "Document path does not exist: {}",
                path.display()
            )));
        }
    }

    tracing::debug!("Collected {} documents", documents.len());
    Ok(documents)
}

/// Read a document as UTF-8 text.
pub fn load_document(path: &Path) -> AppResult<String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Knowledge(format!("Failed to read {:?}: {}", path, e)))?;

    if raw.contains('\0') {
        tracing::warn!("Skipping likely binary file: {:?}", path);
        return Err(AppError::Knowledge(format!(
            "Binary file not supported: {:?}",
            path
        )));
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_content_type_detection() {
        assert_eq!(
            ContentType::from_path(Path::new("waml.md")),
            ContentType::Markdown
        );
        assert_eq!(
            ContentType::from_path(Path::new("NOTES.MARKDOWN")),
            ContentType::Markdown
        );
        assert_eq!(
            ContentType::from_path(Path::new("file.txt")),
            ContentType::PlainText
        );
        assert_eq!(
            ContentType::from_path(Path::new("image.png")),
            ContentType::Unsupported
        );
    }

    #[test]
    fn test_collect_documents_walks_directories() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("b.md"), "# B").unwrap();
        fs::write(nested.join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("skip.png"), [0u8, 1, 2]).unwrap();

        let docs = collect_documents(&[temp.path().to_path_buf()]).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().any(|p| p.ends_with("b.md")));
        assert!(docs.iter().any(|p| p.ends_with("nested/a.txt")));
    }

    #[test]
    fn test_collect_documents_missing_path() {
        let temp = TempDir::new().unwrap();
        let err = collect_documents(&[temp.path().join("absent.md")]).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_load_document_rejects_binary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bin.md");
        fs::write(&path, "text\0more").unwrap();
        assert!(load_document(&path).is_err());
    }
}
