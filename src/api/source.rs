//! Purpose: Resolve and read feed document sources (stdin, file, HTTP url).
//! Exports: `Source`.
//! Role: The retrieval collaborator the decoder's callers invoke before decoding.
//! Invariants: Every read path enforces the caller's byte cap before parsing.
//! Invariants: HTTP failures map status errors to `Http` and transport errors to `Io`.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::core::error::{Error, ErrorKind};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
    Url(Url),
}

impl Source {
    /// Classify a CLI operand: `-` is stdin, an http(s) url is remote,
    /// anything else is a local path.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        if raw == "-" {
            return Ok(Source::Stdin);
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("invalid feed url: {raw}"))
                    .with_source(err)
            })?;
            return Ok(Source::Url(url));
        }
        Ok(Source::File(PathBuf::from(raw)))
    }

    /// Read the whole document, refusing anything larger than `max_bytes`.
    pub fn read(&self, max_bytes: usize) -> Result<Vec<u8>, Error> {
        match self {
            Source::Stdin => read_capped(io::stdin().lock(), max_bytes, "stdin"),
            Source::File(path) => {
                let file = File::open(path).map_err(|err| {
                    let kind = if err.kind() == io::ErrorKind::NotFound {
                        ErrorKind::NotFound
                    } else {
                        ErrorKind::Io
                    };
                    Error::new(kind)
                        .with_message(format!("failed to open {}", path.display()))
                        .with_source(err)
                })?;
                read_capped(file, max_bytes, "file")
            }
            Source::Url(url) => fetch(url, max_bytes),
        }
    }
}

fn read_capped<R: Read>(reader: R, max_bytes: usize, what: &str) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    reader
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut bytes)
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {what}"))
                .with_source(err)
        })?;
    if bytes.len() > max_bytes {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!("document exceeds size limit ({max_bytes} bytes)"))
            .with_hint("Raise --max-bytes if the feed is expected to be this large."));
    }
    Ok(bytes)
}

fn fetch(url: &Url, max_bytes: usize) -> Result<Vec<u8>, Error> {
    let agent = ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build();
    let response = match agent
        .request("GET", url.as_str())
        .set("Accept", "application/json")
        .call()
    {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => {
            return Err(Error::new(ErrorKind::Http)
                .with_message(format!("feed request failed with status {code}")));
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(Error::new(ErrorKind::Io)
                .with_message("feed request failed")
                .with_source(err));
        }
    };
    read_capped(response.into_reader(), max_bytes, "response body")
}

#[cfg(test)]
mod tests {
    use super::Source;
    use crate::core::error::ErrorKind;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn operand_classification() {
        assert_eq!(Source::parse("-").expect("stdin"), Source::Stdin);
        assert_eq!(
            Source::parse("contacts.json").expect("file"),
            Source::File(PathBuf::from("contacts.json"))
        );
        match Source::parse("https://example.com/contacts.json").expect("url") {
            Source::Url(url) => assert_eq!(url.host_str(), Some("example.com")),
            other => panic!("expected url source, got {other:?}"),
        }
    }

    #[test]
    fn invalid_url_is_a_usage_error() {
        let err = Source::parse("http://[bad").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("absent.json");
        let source = Source::File(path);
        let err = source.read(1024).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn oversize_file_is_refused_before_parsing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("big.json");
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(br#"[{"fname":"A","lname":"B"}]"#).expect("write");
        let source = Source::File(path);
        let err = source.read(4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.message().unwrap().contains("size limit"));
    }

    #[test]
    fn file_read_returns_exact_bytes() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("feed.json");
        std::fs::write(&path, b"[]").expect("write");
        let bytes = Source::File(path).read(1024).expect("read");
        assert_eq!(bytes, b"[]");
    }
}
