//! Route table and response status lines

use core::fmt::Write;

use heapless::String;

use crate::http::{HttpError, Method};
use crate::topics::Topic;

/// What a request asks the sign to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// `POST /<topic>` - store the JSON body under the topic key
    Store(Topic),
    /// `POST /set-time` - set the clock from `{"time": <epoch seconds>}`
    SetTime,
    /// `GET /info` - device status document
    Info,
    /// `GET /data` - dump of the whole data store
    Data,
    /// `GET /reboot` - reset the device
    Reboot,
    /// Anything else
    NotFound,
}

impl Route {
    /// Resolve a method and path to a route
    pub fn resolve(method: Method, path: &str) -> Self {
        match (method, path) {
            (Method::Get, "/info") => Route::Info,
            (Method::Get, "/data") => Route::Data,
            (Method::Get, "/reboot") => Route::Reboot,
            (Method::Post, "/set-time") => Route::SetTime,
            (Method::Post, p) => p
                .strip_prefix('/')
                .and_then(Topic::from_key)
                .map(Route::Store)
                .unwrap_or(Route::NotFound),
            _ => Route::NotFound,
        }
    }
}

/// Response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ok,
    InvalidJson,
    MissingTime,
    BadRequest,
    NotFound,
    PayloadTooLarge,
    ServiceUnavailable,
}

impl Status {
    /// Numeric status code
    pub const fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::InvalidJson | Status::MissingTime | Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::PayloadTooLarge => 413,
            Status::ServiceUnavailable => 503,
        }
    }

    /// Reason phrase
    pub const fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::InvalidJson => "Invalid JSON",
            Status::MissingTime => "Missing key 'time'",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::PayloadTooLarge => "Payload Too Large",
            Status::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Response head for a body of `body_len` bytes
    ///
    /// Every response closes the connection.
    pub fn response_head(self, content_type: &str, body_len: usize) -> String<160> {
        let mut head = String::new();
        // 160 bytes covers the longest reason and content type used here
        let _ = write!(
            head,
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.code(),
            self.reason(),
            content_type,
            body_len
        );
        head
    }
}

impl From<HttpError> for Status {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::BodyTooLarge => Status::PayloadTooLarge,
            HttpError::Malformed
            | HttpError::HeaderTooLarge
            | HttpError::UnsupportedMethod
            | HttpError::PathTooLong => Status::BadRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_routes() {
        assert_eq!(
            Route::resolve(Method::Post, "/weather"),
            Route::Store(Topic::Weather)
        );
        assert_eq!(
            Route::resolve(Method::Post, "/tones"),
            Route::Store(Topic::Tones)
        );
        assert_eq!(Route::resolve(Method::Get, "/weather"), Route::NotFound);
        assert_eq!(Route::resolve(Method::Post, "/bogus"), Route::NotFound);
    }

    #[test]
    fn test_fixed_routes() {
        assert_eq!(Route::resolve(Method::Get, "/info"), Route::Info);
        assert_eq!(Route::resolve(Method::Get, "/data"), Route::Data);
        assert_eq!(Route::resolve(Method::Get, "/reboot"), Route::Reboot);
        assert_eq!(Route::resolve(Method::Post, "/set-time"), Route::SetTime);
        assert_eq!(Route::resolve(Method::Post, "/info"), Route::NotFound);
    }

    #[test]
    fn test_response_head() {
        let head = Status::MissingTime.response_head("text/plain", 0);
        assert!(head.starts_with("HTTP/1.1 400 Missing key 'time'\r\n"));
        assert!(head.ends_with("Content-Length: 0\r\nConnection: close\r\n\r\n"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Ok.code(), 200);
        assert_eq!(Status::InvalidJson.code(), 400);
        assert_eq!(Status::PayloadTooLarge.code(), 413);
    }

    #[test]
    fn test_parse_errors_map_to_status() {
        assert_eq!(Status::from(HttpError::BodyTooLarge).code(), 413);
        assert_eq!(Status::from(HttpError::Malformed), Status::BadRequest);
        assert_eq!(Status::from(HttpError::UnsupportedMethod).code(), 400);
    }
}
