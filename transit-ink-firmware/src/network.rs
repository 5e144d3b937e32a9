//! Wi-Fi HTTP session
//!
//! Joins the access point once at startup and keeps one HTTP client for the
//! life of the firmware. There is no reconnection: a dropped link shows up
//! as failed cycles.

use defmt::*;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_net::Stack;
use embedded_io_async::{Read, Write};
use reqwless::client::{HttpClient, HttpRequestHandle, TlsConfig, TlsVerify};
use reqwless::request::RequestBody;
use static_cell::StaticCell;

use transit_ink_core::traits::HttpSession;
use transit_ink_protocol::{Method, Response};

use crate::board::{HTTP_RX_BUFFER_SIZE, TCP_BUFFER_SIZE, TLS_BUFFER_SIZE};

type Tcp = TcpClient<'static, 1, TCP_BUFFER_SIZE, TCP_BUFFER_SIZE>;

static TCP_STATE: StaticCell<TcpClientState<1, TCP_BUFFER_SIZE, TCP_BUFFER_SIZE>> = StaticCell::new();
static TCP_CLIENT: StaticCell<Tcp> = StaticCell::new();
static DNS: StaticCell<DnsSocket<'static>> = StaticCell::new();
static TLS_READ_BUF: StaticCell<[u8; TLS_BUFFER_SIZE]> = StaticCell::new();
static TLS_WRITE_BUF: StaticCell<[u8; TLS_BUFFER_SIZE]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; HTTP_RX_BUFFER_SIZE]> = StaticCell::new();

/// Join the access point and wait for DHCP
///
/// A failed join is fatal; the firmware halts with the radio's status code.
pub async fn join(control: &mut cyw43::Control<'static>, stack: Stack<'static>, ssid: &str, password: &str) {
    info!("Joining {}", ssid);
    if let Err(err) = control
        .join(ssid, cyw43::JoinOptions::new(password.as_bytes()))
        .await
    {
        defmt::panic!("Failed to join {}: status {}", ssid, err.status);
    }

    stack.wait_config_up().await;
    info!("Connected to {}", ssid);
    if let Some(config) = stack.config_v4() {
        info!("Address {}", config.address);
    }
}

/// Map a request verb onto reqwless
fn method(method: Method) -> reqwless::request::Method {
    match method {
        Method::Get => reqwless::request::Method::GET,
        Method::Post => reqwless::request::Method::POST,
        Method::Put => reqwless::request::Method::PUT,
        Method::Delete => reqwless::request::Method::DELETE,
    }
}

/// Send a prepared request and read the whole body into `rx`
async fn exchange<'b, C, B>(
    handle: &mut HttpRequestHandle<'_, C, B>,
    rx: &'b mut [u8],
) -> Result<(u16, &'b [u8]), reqwless::Error>
where
    C: Read + Write,
    B: RequestBody,
{
    let response = handle.send(rx).await?;
    let status = response.status.0;
    let body = response.body().read_to_end().await?;
    Ok((status, body))
}

/// Process-lifetime HTTP session over the Wi-Fi link
pub struct WifiSession {
    client: HttpClient<'static, Tcp, DnsSocket<'static>>,
    rx_buffer: &'static mut [u8],
}

impl WifiSession {
    /// Build the HTTP client on top of a configured stack
    ///
    /// Certificates are not verified.
    pub fn new(stack: Stack<'static>, seed: u64) -> Self {
        let state = TCP_STATE.init(TcpClientState::new());
        let tcp = TCP_CLIENT.init(TcpClient::new(stack, state));
        let dns = DNS.init(DnsSocket::new(stack));

        let tls = TlsConfig::new(
            seed,
            TLS_READ_BUF.init([0; TLS_BUFFER_SIZE]),
            TLS_WRITE_BUF.init([0; TLS_BUFFER_SIZE]),
            TlsVerify::None,
        );

        Self {
            client: HttpClient::new_with_tls(tcp, dns, tls),
            rx_buffer: RX_BUF.init([0; HTTP_RX_BUFFER_SIZE]),
        }
    }
}

impl HttpSession for WifiSession {
    type Error = reqwless::Error;

    async fn request(
        &mut self,
        verb: Method,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<Response<'_>, Self::Error> {
        debug!("{} {}", verb.as_str(), url);
        let handle = self.client.request(method(verb), url).await?;

        let (status, received) = match body {
            Some(data) => exchange(&mut handle.body(data), &mut self.rx_buffer[..]).await?,
            None => {
                let mut handle = handle;
                exchange(&mut handle, &mut self.rx_buffer[..]).await?
            }
        };

        debug!("HTTP {} ({} bytes)", status, received.len());
        Ok(Response::new(status, received))
    }
}
