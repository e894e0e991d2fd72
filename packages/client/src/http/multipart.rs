//! `multipart/form-data` bodies
//!
//! The file is written first, followed by plain text fields; each part is
//! framed by `--{boundary}\r\n` and the body ends with `--{boundary}--\r\n`.

use std::fmt::Write as _;
use std::io::Read;
use std::path::PathBuf;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{self, Result};

/// Form field name the uploaded file is sent under.
pub const FILE_FIELD: &str = "filename";

/// Where the uploaded file content comes from.
pub enum FileSource {
    Bytes(Bytes),
    Path(PathBuf),
    Reader(Box<dyn Read + Send>),
}

impl FileSource {
    /// Stream source content from any reader.
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        FileSource::Reader(Box::new(reader))
    }

    fn load(self) -> Result<Bytes> {
        match self {
            FileSource::Bytes(bytes) => Ok(bytes),
            FileSource::Path(path) => std::fs::read(&path)
                .map(Bytes::from)
                .map_err(|e| error::encode(format!("open {}: {e}", path.display()))),
            FileSource::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).map_err(error::encode)?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSource::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            FileSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            FileSource::Reader(_) => f.write_str("Reader"),
        }
    }
}

impl From<Vec<u8>> for FileSource {
    fn from(value: Vec<u8>) -> Self {
        FileSource::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for FileSource {
    fn from(value: &[u8]) -> Self {
        FileSource::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Bytes> for FileSource {
    fn from(value: Bytes) -> Self {
        FileSource::Bytes(value)
    }
}

impl From<PathBuf> for FileSource {
    fn from(value: PathBuf) -> Self {
        FileSource::Path(value)
    }
}

impl From<&std::path::Path> for FileSource {
    fn from(value: &std::path::Path) -> Self {
        FileSource::Path(value.to_path_buf())
    }
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    filename: Option<String>,
    data: Bytes,
}

/// A buffered multipart form.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// Empty form with a random boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_boundary(generate_boundary())
    }

    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Add a file part under [`FILE_FIELD`].
    ///
    /// # Errors
    ///
    /// Returns an encode error if the source cannot be read.
    pub fn file(mut self, filename: impl Into<String>, source: FileSource) -> Result<Self> {
        let data = source.load()?;
        self.parts.push(Part {
            name: FILE_FIELD.to_string(),
            filename: Some(filename.into()),
            data,
        });
        Ok(self)
    }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part {
            name: name.into(),
            filename: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// `Content-Type` header value carrying the boundary.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut body = BytesMut::new();

        for part in &self.parts {
            let mut head = format!("--{}\r\n", self.boundary);
            let _ = write!(
                head,
                "Content-Disposition: form-data; name=\"{}\"",
                escape_quotes(&part.name)
            );
            if let Some(filename) = &part.filename {
                let _ = write!(head, "; filename=\"{}\"", escape_quotes(filename));
                head.push_str("\r\nContent-Type: application/octet-stream");
            }
            head.push_str("\r\n\r\n");

            body.put_slice(head.as_bytes());
            body.put_slice(&part.data);
            body.put_slice(b"\r\n");
        }

        body.put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        body.freeze()
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Generate a multipart boundary
#[must_use]
pub fn generate_boundary() -> String {
    format!("----formdata-httpcheck-{:016x}", fastrand::u64(..))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_part_precedes_fields() {
        let form = MultipartForm::with_boundary("XYZ")
            .file("a.txt", FileSource::from(&b"hello"[..]))
            .expect("in-memory source")
            .text("key", "value");

        let expected = concat!(
            "--XYZ\r\n",
            "Content-Disposition: form-data; name=\"filename\"; filename=\"a.txt\"\r\n",
            "Content-Type: application/octet-stream\r\n\r\n",
            "hello\r\n",
            "--XYZ\r\n",
            "Content-Disposition: form-data; name=\"key\"\r\n\r\n",
            "value\r\n",
            "--XYZ--\r\n",
        );
        assert_eq!(form.encode(), Bytes::from_static(expected.as_bytes()));
        assert_eq!(form.content_type(), "multipart/form-data; boundary=XYZ");
    }

    #[test]
    fn quotes_in_names_are_escaped() {
        let form = MultipartForm::with_boundary("b").text("a\"b", "v");
        let encoded = form.encode();
        let text = std::str::from_utf8(&encoded).expect("utf-8");
        assert!(text.contains("name=\"a\\\"b\""));
    }

    #[test]
    fn missing_file_is_an_encode_error() {
        let err = MultipartForm::new()
            .file("x", FileSource::Path(PathBuf::from("/definitely/not/here")))
            .expect_err("missing file");
        assert_eq!(err.kind(), crate::error::Kind::Encode);
    }

    #[test]
    fn boundaries_are_random() {
        assert_ne!(generate_boundary(), generate_boundary());
        assert!(generate_boundary().starts_with("----formdata-httpcheck-"));
    }
}
