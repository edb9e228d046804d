use crate::models::Corpus;
use crate::search::ContentSource;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
}

/// Read a markdown file and return its content
pub fn read_file(relative_path: &RelativePath, notes_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(notes_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Scan for markdown files in the notes directory
pub fn scan_markdown_files(notes_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !notes_root.exists() {
        return Err(IoError::InvalidNotesDir(
            "notes directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(notes_root, &mut files)?;
    files.sort();
    Ok(files)
}

/// Build the search corpus from the markdown files under `notes_root`
///
/// Entries are ordered by path; display names are file names without `.md`.
pub fn load_corpus(notes_root: &Path) -> Result<Corpus, IoError> {
    let files = scan_markdown_files(notes_root)?;
    let relative = files.iter().filter_map(|file| {
        let rel = file.strip_prefix(notes_root).ok()?;
        RelativePathBuf::from_path(rel).ok()
    });
    Ok(Corpus::from_paths(relative))
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidNotesDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

/// Reads corpus documents from a notes directory on disk
#[derive(Debug, Clone)]
pub struct FsContentSource {
    notes_root: PathBuf,
}

impl FsContentSource {
    pub fn new(notes_root: impl Into<PathBuf>) -> Self {
        Self {
            notes_root: notes_root.into(),
        }
    }

    pub fn notes_root(&self) -> &Path {
        &self.notes_root
    }
}

impl ContentSource for FsContentSource {
    fn read(&self, path: &RelativePath) -> Result<String, IoError> {
        read_file(path, &self.notes_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_notes_dir};

    #[test]
    fn test_scan_and_load_files() {
        // Given a notes directory with markdown files
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "test1.md", "- First item\n- Second item");
        create_test_file(&notes_dir, "test2.md", "# Heading");

        // When scanning for files
        let files = scan_markdown_files(notes_dir.path()).unwrap();

        // Then we find the expected files
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.file_name().unwrap() == "test1.md"));
        assert!(files.iter().any(|f| f.file_name().unwrap() == "test2.md"));
    }

    #[test]
    fn test_handle_invalid_notes_directory() {
        let nonexistent_path = PathBuf::from("/this/path/does/not/exist");

        let result = scan_markdown_files(&nonexistent_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("notes directory"));
    }

    #[test]
    fn test_ignore_non_markdown_files() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "document.md", "# Markdown");
        create_test_file(&notes_dir, "image.png", "fake image data");
        create_test_file(&notes_dir, "config.json", "{}");

        let files = scan_markdown_files(notes_dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap(), "document.md");
    }

    #[test]
    fn test_load_corpus_uses_relative_paths_in_sorted_order() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "zeta.md", "z");
        create_test_file(&notes_dir, "guides/alpha.md", "a");

        let corpus = load_corpus(notes_dir.path()).unwrap();

        let paths: Vec<&str> = corpus
            .entries()
            .iter()
            .map(|e| e.relative_path().as_str())
            .collect();
        assert_eq!(paths, vec!["guides/alpha.md", "zeta.md"]);
        assert_eq!(corpus.entries()[0].display_name(), "alpha");
    }

    #[test]
    fn test_validate_notes_dir_exists() {
        let notes_dir = create_test_notes_dir();
        let result = validate_notes_dir(notes_dir.path());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_notes_dir_not_exists() {
        let result = validate_notes_dir(Path::new("/nonexistent/path"));
        assert!(matches!(result, Err(IoError::InvalidNotesDir(_))));
    }

    #[test]
    fn test_read_file_success() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "test.md", "# Test Content\n\nParagraph");

        let content = read_file(RelativePath::new("test.md"), notes_dir.path()).unwrap();
        assert_eq!(content, "# Test Content\n\nParagraph");
    }

    #[test]
    fn test_read_file_not_found() {
        let notes_dir = create_test_notes_dir();
        let result = read_file(RelativePath::new("nonexistent.md"), notes_dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_fs_content_source_reads_nested_documents() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "a/b.md", "nested");

        let source = FsContentSource::new(notes_dir.path());
        assert_eq!(source.read(RelativePath::new("a/b.md")).unwrap(), "nested");
        assert!(source.read(RelativePath::new("missing.md")).is_err());
    }
}
