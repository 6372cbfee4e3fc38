//! File downloads of the document.
//!
//! A [`DownloadSink`] receives a payload plus the MIME type and suggested file
//! name, and reports where the file ended up.

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

/// Which representation of the document to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// The Rendered View.
    Html,
    /// The raw Document.
    Markdown,
}

impl ExportFormat {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Html => "document.html",
            Self::Markdown => "document.md",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Markdown => "text/markdown",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free file name for {0} in the export directory")]
    NameExhausted(String),
}

pub trait DownloadSink {
    /// Deliver `payload` under `filename`, returning the final location.
    fn deliver(&mut self, payload: &[u8], mime: &str, filename: &str)
    -> Result<PathBuf, ExportError>;
}

const MAX_NAME_ATTEMPTS: usize = 10_000;

/// Writes downloads into a directory, never replacing an existing file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(
        &mut self,
        payload: &[u8],
        mime: &str,
        filename: &str,
    ) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(numbered_name(filename, attempt));
            // create_new makes the existence check and the create one step.
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(ExportError::Write { path, source }),
            };
            write_or_discard(&path, &mut file, payload)?;
            tracing::info!(path = %path.display(), mime, bytes = payload.len(), "exported");
            return Ok(path);
        }
        Err(ExportError::NameExhausted(filename.to_string()))
    }
}

/// Write the whole payload. On failure the file is removed again.
fn write_or_discard(
    path: &Path,
    out: &mut impl Write,
    payload: &[u8],
) -> Result<(), ExportError> {
    out.write_all(payload)
        .and_then(|()| out.flush())
        .map_err(|source| {
            if let Err(err) = fs::remove_file(path) {
                tracing::warn!(path = %path.display(), %err, "could not remove partial export");
            }
            ExportError::Write {
                path: path.to_path_buf(),
                source,
            }
        })
}

/// `document.md`, `document (1).md`, `document (2).md`, ...
fn numbered_name(filename: &str, attempt: usize) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({attempt}).{ext}"),
        _ => format!("{filename} ({attempt})"),
    }
}

/// One recorded download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub filename: String,
    pub mime: String,
    pub payload: Vec<u8>,
}

/// Records downloads in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    deliveries: Rc<RefCell<Vec<Delivery>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.borrow().clone()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(
        &mut self,
        payload: &[u8],
        mime: &str,
        filename: &str,
    ) -> Result<PathBuf, ExportError> {
        self.deliveries.borrow_mut().push(Delivery {
            filename: filename.to_string(),
            mime: mime.to_string(),
            payload: payload.to_vec(),
        });
        Ok(PathBuf::from(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_names_and_mime_types() {
        assert_eq!(ExportFormat::Html.file_name(), "document.html");
        assert_eq!(ExportFormat::Html.mime_type(), "text/html");
        assert_eq!(ExportFormat::Markdown.file_name(), "document.md");
        assert_eq!(ExportFormat::Markdown.mime_type(), "text/markdown");
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("document.md", 0), "document.md");
        assert_eq!(numbered_name("document.md", 2), "document (2).md");
        assert_eq!(numbered_name("README", 1), "README (1)");
        assert_eq!(numbered_name(".hidden", 1), ".hidden (1)");
    }

    #[test]
    fn test_directory_sink_never_overwrites() {
        let dir = tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out"));

        let first = sink.deliver(b"one", "text/markdown", "document.md").unwrap();
        let second = sink.deliver(b"two", "text/markdown", "document.md").unwrap();

        assert_eq!(first.file_name().unwrap(), "document.md");
        assert_eq!(second.file_name().unwrap(), "document (1).md");
        assert_eq!(fs::read_to_string(first).unwrap(), "one");
        assert_eq!(fs::read_to_string(second).unwrap(), "two");
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_removes_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("document.md");
        fs::write(&path, "").unwrap();

        let err = write_or_discard(&path, &mut BrokenWriter, b"payload").unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
        assert!(!path.exists());

        // The freed name is reused by the next export.
        let mut sink = DirectorySink::new(dir.path());
        let next = sink.deliver(b"ok", "text/markdown", "document.md").unwrap();
        assert_eq!(next, path);
    }

    #[test]
    fn test_memory_sink_records_payload() {
        let sink = MemorySink::new();
        let mut handle = sink.clone();
        handle.deliver(b"<p>x</p>", "text/html", "document.html").unwrap();

        let deliveries = sink.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].filename, "document.html");
        assert_eq!(deliveries[0].mime, "text/html");
        assert_eq!(deliveries[0].payload, b"<p>x</p>");
    }
}
