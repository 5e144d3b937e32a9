//! HTTP response view
//!
//! A [`Response`] borrows its body from the session's receive buffer, so it
//! cannot outlive the request that produced it. Dropping the response is
//! what releases the session for the next request.

use serde::de::DeserializeOwned;

use crate::error::ProtocolError;
use crate::lines::{decode_lines, Lines};

/// The only status code the board accepts
pub const STATUS_OK: u16 = 200;

/// Response to a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response<'a> {
    status: u16,
    body: &'a [u8],
}

impl<'a> Response<'a> {
    /// Wrap a status code and a fully received body
    pub const fn new(status: u16, body: &'a [u8]) -> Self {
        Self { status, body }
    }

    /// HTTP status code
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// True for `200 OK`
    pub const fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Raw body bytes
    pub const fn body(&self) -> &'a [u8] {
        self.body
    }

    /// Body as UTF-8 text
    pub fn text(&self) -> Result<&'a str, ProtocolError> {
        core::str::from_utf8(self.body).map_err(|_| ProtocolError::InvalidUtf8)
    }

    /// Decode the body as JSON, regardless of status
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        Ok(serde_json::from_str(self.text()?)?)
    }

    /// Interpret the response as the board's line payload
    ///
    /// Fails for any status other than 200 before looking at the body.
    pub fn lines(&self) -> Result<Lines, ProtocolError> {
        if !self.is_ok() {
            return Err(ProtocolError::Status(self.status));
        }
        decode_lines(self.body)
    }
}
