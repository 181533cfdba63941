//! Documentation loading for the deployment prompt.
//!
//! Walks a directory tree and concatenates every Markdown, plain-text and
//! Word document into a single context string.

use camino::{Utf8Path, Utf8PathBuf};
use quick_xml::{Reader, events::Event};
use std::{
    fs,
    io::{self, Read},
};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Archive member holding the body of a Word document.
const DOCX_BODY: &str = "word/document.xml";

/// Errors raised while loading documentation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The documentation root is missing or not a directory.
    #[error("documentation directory {path} does not exist")]
    MissingRoot {
        /// The directory that was requested.
        path: Utf8PathBuf,
    },
    /// Directory traversal failed.
    #[error("failed to walk {path}")]
    Walk {
        /// The documentation root.
        path: Utf8PathBuf,
        /// Underlying traversal error.
        #[source]
        source: walkdir::Error,
    },
    /// A document could not be read as UTF-8 text.
    #[error("failed to read {path}")]
    Read {
        /// The document that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A Word document is not a readable zip archive.
    #[error("failed to open {path} as a Word document")]
    Archive {
        /// The document that failed.
        path: Utf8PathBuf,
        /// Underlying archive error.
        #[source]
        source: zip::result::ZipError,
    },
    /// A Word document body is not well-formed XML.
    #[error("malformed document body in {path}")]
    Xml {
        /// The document that failed.
        path: Utf8PathBuf,
        /// Underlying XML error.
        #[source]
        source: quick_xml::Error,
    },
}

/// Document formats recognised by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.md` files.
    Markdown,
    /// `.txt` files.
    Text,
    /// `.docx` files; only paragraph text is kept.
    WordProcessor,
}

impl DocumentKind {
    /// Classify a path by its extension.
    #[must_use]
    pub fn of(path: &Utf8Path) -> Option<Self> {
        match path.extension()? {
            "md" => Some(Self::Markdown),
            "txt" => Some(Self::Text),
            "docx" => Some(Self::WordProcessor),
            _ => None,
        }
    }
}

/// Concatenate all readable documents under `root`.
///
/// Files are visited in file-name order, symbolic links are not followed, and
/// documents are joined with a blank line. A Word document contributes its
/// paragraphs joined by newlines. Files whose paths are not UTF-8 are skipped
/// with a warning.
///
/// # Errors
///
/// Returns [`DocsError`] if `root` is not a directory, traversal fails or a
/// document cannot be read.
pub fn load_dir(root: &Utf8Path) -> Result<String, DocsError> {
    if !root.is_dir() {
        return Err(DocsError::MissingRoot {
            path: root.to_owned(),
        });
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| DocsError::Walk {
            path: root.to_owned(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(path) = Utf8Path::from_path(entry.path()) else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };
        let text = match DocumentKind::of(path) {
            Some(DocumentKind::Markdown | DocumentKind::Text) => {
                fs::read_to_string(path).map_err(|source| DocsError::Read {
                    path: path.to_owned(),
                    source,
                })?
            }
            Some(DocumentKind::WordProcessor) => read_docx(path)?,
            None => continue,
        };
        debug!(%path, bytes = text.len(), "loaded document");
        documents.push(text);
    }
    Ok(documents.join("\n\n"))
}

fn read_docx(path: &Utf8Path) -> Result<String, DocsError> {
    let read_err = |source| DocsError::Read {
        path: path.to_owned(),
        source,
    };
    let archive_err = |source| DocsError::Archive {
        path: path.to_owned(),
        source,
    };
    let file = fs::File::open(path).map_err(read_err)?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_err)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(archive_err)?
        .read_to_string(&mut xml)
        .map_err(read_err)?;
    paragraphs(&xml).map_err(|source| DocsError::Xml {
        path: path.to_owned(),
        source,
    })
}

/// Text of every `w:p` paragraph in a document body, one per line.
///
/// Text runs (`w:t`) are concatenated; `w:tab` and `w:br` become a tab and a
/// newline.
fn paragraphs(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => lines.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" => current.push('\n'),
                b"p" => lines.push(String::new()),
                _ => {}
            },
            Event::Eof => return Ok(lines.join("\n")),
            _ => {}
        }
    }
}
