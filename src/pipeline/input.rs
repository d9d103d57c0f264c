//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! pdfium requires a file-system path — it cannot stream from a byte buffer.
//! URL inputs are downloaded into a `TempDir`, which keeps the file alive
//! for the duration of the run and removes it automatically when the
//! [`ResolvedPdf`] is dropped, even on panic. The `%PDF` magic bytes are
//! validated up front so callers get a meaningful error rather than a
//! pdfium parse failure.

use crate::error::PdftileError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input — either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedPdf {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the PDF lives in a temp directory that is cleaned
    /// up when this value is dropped.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedPdf {
    /// Path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedPdf::Local(p) => p,
            ResolvedPdf::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedPdf, PdftileError> {
    if input.trim().is_empty() {
        return Err(PdftileError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Validate an existing local file: readable, starts with `%PDF`.
fn resolve_local(path_str: &str) -> Result<ResolvedPdf, PdftileError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(PdftileError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PdftileError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdftileError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdftileError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedPdf::Local(path))
}

/// Download a URL into a temp directory and validate it is a PDF.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedPdf, PdftileError> {
    info!("Downloading PDF from: {}", url);

    let failed = |reason: String| PdftileError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            PdftileError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let filename = filename_from_url(url);
    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;

    let temp_dir = TempDir::new().map_err(|e| PdftileError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(filename);

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| PdftileError::Internal(format!("Failed to write temp file: {e}")))?;

    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(PdftileError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedPdf::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last URL path segment if it looks like a filename, else a fixed default.
fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut s| s.next_back().map(str::to_string))
        })
        .filter(|last| !last.is_empty() && last.contains('.'))
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn filename_from_url_prefers_last_segment() {
        assert_eq!(
            filename_from_url("https://example.com/papers/attention.pdf"),
            "attention.pdf"
        );
        // No extension in the path → default name
        assert_eq!(
            filename_from_url("https://arxiv.org/pdf/1706"),
            "downloaded.pdf"
        );
        assert_eq!(filename_from_url("https://example.com/"), "downloaded.pdf");
    }

    #[test]
    fn resolve_local_missing_file() {
        let err = resolve_local("/definitely/not/a/real/file.pdf").unwrap_err();
        assert!(matches!(err, PdftileError::FileNotFound { .. }));
    }

    #[test]
    fn resolve_local_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_pdf.pdf");
        std::fs::write(&path, b"PK\x03\x04zipzipzip").unwrap();

        let err = resolve_local(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PdftileError::NotAPdf { .. }));
    }

    #[test]
    fn resolve_local_accepts_pdf_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").unwrap();

        let resolved = resolve_local(path.to_str().unwrap()).unwrap();
        assert_eq!(resolved.path(), path);
    }
}
