//! # Path Resolution
//!
//! Abstracts reading video bytes from a location that may be local or
//! remote, hiding transport details from the loader.

use crate::error::{Result, VideoError};
use bytes::Bytes;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Opens paths for binary reads.
///
/// Implementations resolve a path or URI to a byte stream. The loader reads
/// the stream to the end and drops it before doing anything else, so
/// implementations only need to support sequential reads.
pub trait PathResolver: Send + Sync {
    /// Open the given path for reading.
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>>;
}

/// Resolver for paths on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPathResolver;

impl PathResolver for LocalPathResolver {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let file = std::fs::File::open(Path::new(path)).map_err(|e| {
            VideoError::SourceError(format!("Failed to open file {path}: {e}"))
        })?;
        Ok(Box::new(file))
    }
}

/// Resolver for `http://` / `https://` URIs.
///
/// Downloads the resource body as the byte stream. Local (non-URL) paths are
/// rejected; compose with [`LocalPathResolver`] at the call site if both are
/// needed.
#[cfg(feature = "http-resolver")]
pub struct HttpPathResolver {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http-resolver")]
impl HttpPathResolver {
    /// Create a resolver with a 30 second request timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| VideoError::SourceError(format!("HTTP client error: {e}")))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http-resolver")]
impl PathResolver for HttpPathResolver {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        debug!("Fetching video from {}", path);
        let response = self
            .client
            .get(path)
            .send()
            .map_err(|e| VideoError::SourceError(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(VideoError::SourceError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        Ok(Box::new(response))
    }
}

/// Read the full contents of a path into an owned buffer.
///
/// The underlying handle is dropped as soon as the read completes, before
/// the caller proceeds, on success and error paths alike.
pub(crate) fn read_to_bytes(resolver: &dyn PathResolver, path: &str) -> Result<Bytes> {
    let mut stream = resolver.open(path)?;
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    drop(stream);
    debug!("Read {} bytes from {}", buf.len(), path);
    Ok(Bytes::from(buf))
}

/// The final path segment of a path or URI, with directory components
/// stripped.
pub(crate) fn video_name(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn local_resolver_reads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really a video").unwrap();

        let resolver = LocalPathResolver;
        let data = read_to_bytes(&resolver, file.path().to_str().unwrap()).unwrap();
        assert_eq!(&data[..], b"not really a video");
    }

    #[test]
    fn local_resolver_missing_file_is_source_error() {
        let resolver = LocalPathResolver;
        let err = resolver.open("/definitely/not/here.mp4").err().unwrap();
        assert!(err.is_source_error());
    }

    #[test]
    fn video_name_strips_directories() {
        assert_eq!(video_name("/data/videos/clip.mp4"), "clip.mp4");
        assert_eq!(video_name("clip.mp4"), "clip.mp4");
        assert_eq!(video_name("C:\\videos\\clip.mp4"), "clip.mp4");
    }

    #[test]
    fn video_name_handles_remote_uris() {
        assert_eq!(
            video_name("https://example.com/bucket/clip.mp4"),
            "clip.mp4"
        );
        assert_eq!(video_name("s3://bucket/dir/clip.webm"), "clip.webm");
    }
}
