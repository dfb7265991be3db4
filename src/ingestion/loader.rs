//! Document loading from a category-organized directory tree
//!
//! Layout: `<root>/<category>/**/*.{pdf,txt}`. Per-file and per-page
//! extraction failures are logged and skipped, never fatal to the batch.

use std::path::Path;
use std::str::FromStr;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{DocCategory, Document, DocumentSource, FileType};

/// Loads documents from PDF and plain-text files
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load all supported documents under `root`.
    ///
    /// The first path component below `root` names the document's category;
    /// files outside a known category directory are skipped.
    pub fn load_all(root: &Path) -> Result<Vec<Document>> {
        if !root.exists() {
            return Err(Error::Config(format!(
                "Documents directory {} does not exist",
                root.display()
            )));
        }

        let mut documents = Vec::new();

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();

            let Some(file_type) = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(FileType::from_extension)
            else {
                continue;
            };

            let Some(category) = Self::category_for(root, path) else {
                tracing::warn!(
                    "Skipping {}: not under a known category directory",
                    path.display()
                );
                continue;
            };

            let loaded = match file_type {
                FileType::Pdf => Self::load_pdf(path, category),
                FileType::Txt => Self::load_txt(path, category),
            };

            match loaded {
                Ok(docs) => {
                    tracing::debug!("Loaded {} page(s) from {}", docs.len(), path.display());
                    documents.extend(docs);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }

        tracing::info!("Loaded {} document pages from {}", documents.len(), root.display());
        Ok(documents)
    }

    /// Category from the first path component below the root
    fn category_for(root: &Path, path: &Path) -> Option<DocCategory> {
        let relative = path.strip_prefix(root).ok()?;
        let first = relative.components().next()?;
        DocCategory::from_str(first.as_os_str().to_str()?).ok()
    }

    /// Load a PDF, one document per non-empty page
    pub fn load_pdf(path: &Path, category: DocCategory) -> Result<Vec<Document>> {
        let filename = Self::filename_of(path);
        let pdf = lopdf::Document::load(path)
            .map_err(|e| Error::extraction(&filename, e.to_string()))?;

        let mut documents = Vec::new();
        for (&page_number, _) in pdf.get_pages().iter() {
            let text = match pdf.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        "Skipping page {} of {}: {}",
                        page_number,
                        filename,
                        e
                    );
                    continue;
                }
            };

            if text.trim().is_empty() {
                continue;
            }

            documents.push(Document::new(
                text,
                DocumentSource {
                    filename: filename.clone(),
                    file_path: path.display().to_string(),
                    file_type: FileType::Pdf,
                    page_number: Some(page_number),
                    category,
                },
            ));
        }

        Ok(documents)
    }

    /// Load a plain-text file as a single document
    pub fn load_txt(path: &Path, category: DocCategory) -> Result<Vec<Document>> {
        let filename = Self::filename_of(path);
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::extraction(&filename, e.to_string()))?;

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![Document::new(
            text,
            DocumentSource {
                filename,
                file_path: path.display().to_string(),
                file_type: FileType::Txt,
                page_number: None,
                category,
            },
        )])
    }

    fn filename_of(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_txt_files_with_category_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let insurance = dir.path().join("insurance");
        fs::create_dir(&insurance).unwrap();
        fs::write(insurance.join("policy.txt"), "annual premium increase").unwrap();

        let docs = DocumentLoader::load_all(dir.path()).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source.category, DocCategory::Insurance);
        assert_eq!(docs[0].source.filename, "policy.txt");
        assert_eq!(docs[0].content, "annual premium increase");
    }

    #[test]
    fn skips_files_outside_category_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stray.txt"), "not categorized").unwrap();
        let misc = dir.path().join("misc");
        fs::create_dir(&misc).unwrap();
        fs::write(misc.join("note.txt"), "unknown category").unwrap();

        let docs = DocumentLoader::load_all(dir.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn empty_txt_yields_no_documents() {
        let dir = tempfile::tempdir().unwrap();
        let healthcare = dir.path().join("healthcare");
        fs::create_dir(&healthcare).unwrap();
        fs::write(healthcare.join("empty.txt"), "   \n").unwrap();

        let docs = DocumentLoader::load_all(dir.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn corrupt_file_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let pharma = dir.path().join("pharmaceutical");
        fs::create_dir(&pharma).unwrap();
        fs::write(pharma.join("broken.pdf"), b"not a real pdf").unwrap();
        fs::write(pharma.join("trial.txt"), "drug trial results").unwrap();

        let docs = DocumentLoader::load_all(dir.path()).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source.filename, "trial.txt");
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(DocumentLoader::load_all(Path::new("/nonexistent/medrag-docs")).is_err());
    }
}
