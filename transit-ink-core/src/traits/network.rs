//! Network session trait
//!
//! One session is created at startup (radio association plus HTTP client)
//! and reused for every request. The [`Response`] returned by a request
//! borrows the session, so the borrow checker enforces that it is released
//! before the next request goes out.

use transit_ink_protocol::{Method, Response};

/// HTTP session over an established network link
#[allow(async_fn_in_trait)]
pub trait HttpSession {
    /// Transport, DNS, TLS or HTTP framing error
    type Error;

    /// Issue a request and receive the full response body
    async fn request(
        &mut self,
        method: Method,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<Response<'_>, Self::Error>;

    /// `GET url`
    async fn get(&mut self, url: &str) -> Result<Response<'_>, Self::Error> {
        self.request(Method::Get, url, None).await
    }

    /// `POST url` with `data` as body
    async fn post(&mut self, url: &str, data: &[u8]) -> Result<Response<'_>, Self::Error> {
        self.request(Method::Post, url, Some(data)).await
    }

    /// `PUT url` with `data` as body
    async fn put(&mut self, url: &str, data: &[u8]) -> Result<Response<'_>, Self::Error> {
        self.request(Method::Put, url, Some(data)).await
    }

    /// `DELETE url`
    async fn delete(&mut self, url: &str) -> Result<Response<'_>, Self::Error> {
        self.request(Method::Delete, url, None).await
    }
}
