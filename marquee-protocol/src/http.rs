//! HTTP/1.x request parsing
//!
//! Only what the sign needs: the request line, `Content-Length`, and a
//! body of bounded size. Bytes can arrive in any split; the parser is fed
//! incrementally from the socket.

use heapless::{String, Vec};

/// Maximum size of the request line plus headers
pub const MAX_HEAD_SIZE: usize = 768;

/// Maximum accepted body size
pub const MAX_BODY_SIZE: usize = 4096;

/// Maximum path length (query string excluded)
pub const MAX_PATH_LEN: usize = 48;

/// Errors that can occur while parsing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpError {
    /// Request line or header could not be understood
    Malformed,
    /// Request line plus headers exceed [`MAX_HEAD_SIZE`]
    HeaderTooLarge,
    /// Declared body exceeds [`MAX_BODY_SIZE`]
    BodyTooLarge,
    /// Method other than GET or POST
    UnsupportedMethod,
    /// Path longer than [`MAX_PATH_LEN`]
    PathTooLong,
}

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn parse(token: &str) -> Result<Self, HttpError> {
        match token {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            _ => Err(HttpError::UnsupportedMethod),
        }
    }
}

/// Parsed request line and the headers the sign cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: Method,
    /// Path without the query string
    pub path: String<MAX_PATH_LEN>,
    pub content_length: usize,
}

impl RequestHead {
    /// Parse the head from raw bytes, excluding the blank line terminator
    pub fn parse(raw: &[u8]) -> Result<Self, HttpError> {
        let text = core::str::from_utf8(raw).map_err(|_| HttpError::Malformed)?;
        let mut lines = text.split("\r\n");

        let request_line = lines.next().ok_or(HttpError::Malformed)?;
        let mut parts = request_line.split(' ').filter(|p| !p.is_empty());
        let method = Method::parse(parts.next().ok_or(HttpError::Malformed)?)?;
        let target = parts.next().ok_or(HttpError::Malformed)?;
        let version = parts.next().ok_or(HttpError::Malformed)?;
        if !version.starts_with("HTTP/1.") || parts.next().is_some() {
            return Err(HttpError::Malformed);
        }

        let raw_path = target.split('?').next().unwrap_or(target);
        if !raw_path.starts_with('/') {
            return Err(HttpError::Malformed);
        }
        let mut path = String::new();
        path.push_str(raw_path)
            .map_err(|_| HttpError::PathTooLong)?;

        let mut content_length = 0;
        for line in lines.filter(|l| !l.is_empty()) {
            let (name, value) = line.split_once(':').ok_or(HttpError::Malformed)?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| HttpError::Malformed)?;
            }
        }

        Ok(Self {
            method,
            path,
            content_length,
        })
    }
}

/// A complete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub head: RequestHead,
    pub body: Vec<u8, MAX_BODY_SIZE>,
}

/// State machine for parsing incoming requests
#[derive(Debug, Clone)]
pub struct RequestParser {
    state: ParseState,
    head_buf: Vec<u8, MAX_HEAD_SIZE>,
    head: Option<RequestHead>,
    body: Vec<u8, MAX_BODY_SIZE>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Collecting request line and headers
    ReadingHead,
    /// Collecting `content_length` body bytes
    ReadingBody,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    /// Create a new request parser
    pub fn new() -> Self {
        Self {
            state: ParseState::ReadingHead,
            head_buf: Vec::new(),
            head: None,
            body: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::ReadingHead;
        self.head_buf.clear();
        self.head = None;
        self.body.clear();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(request))` when a complete request is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    /// The parser resets itself after a complete request or an error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Request>, HttpError> {
        match self.state {
            ParseState::ReadingHead => {
                if self.head_buf.push(byte).is_err() {
                    self.reset();
                    return Err(HttpError::HeaderTooLarge);
                }
                if !self.head_buf.ends_with(b"\r\n\r\n") {
                    return Ok(None);
                }

                let raw = &self.head_buf[..self.head_buf.len() - 4];
                let head = match RequestHead::parse(raw) {
                    Ok(head) => head,
                    Err(e) => {
                        self.reset();
                        return Err(e);
                    }
                };
                if head.content_length > MAX_BODY_SIZE {
                    self.reset();
                    return Err(HttpError::BodyTooLarge);
                }
                if head.content_length == 0 {
                    return Ok(Some(self.finish(head)));
                }
                self.head = Some(head);
                self.state = ParseState::ReadingBody;
                Ok(None)
            }
            ParseState::ReadingBody => {
                // Capacity was checked against content_length
                let _ = self.body.push(byte);
                match self.head.take() {
                    Some(head) if self.body.len() >= head.content_length => {
                        Ok(Some(self.finish(head)))
                    }
                    head => {
                        self.head = head;
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete request found, if any. Bytes after the
    /// end of that request are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Request>, HttpError> {
        for &byte in bytes {
            if let Some(request) = self.feed(byte)? {
                return Ok(Some(request));
            }
        }
        Ok(None)
    }

    fn finish(&mut self, head: RequestHead) -> Request {
        let body = core::mem::take(&mut self.body);
        self.reset();
        Request { head, body }
    }
}
