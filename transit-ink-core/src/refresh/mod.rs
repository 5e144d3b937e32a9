//! Refresh loop
//!
//! Fetches the line list, redraws the panel and sleeps, forever.
//!
//! ```text
//!        +---------+    +--------+    +--------+    +---------+
//!   +--> |  fetch  | -> | decode | -> | render | -> | display |
//!   |    +---------+    +--------+    +--------+    +---------+
//!   |         |              |             |              |
//!   |         +--------------+------+------+--------------+
//!   |                               v
//!   +--------------------------- sleep (interval) <-- log failure
//! ```
//!
//! Every failure is handled the same way: log it and try again after the
//! normal interval. There is no backoff and no retry limit.

mod error;
mod stats;

pub use error::CycleError;
pub use stats::RefreshStats;

use core::fmt::Debug;

use embedded_hal_async::delay::DelayNs;
use heapless::String;
use transit_ink_protocol::Lines;

use crate::config::{Settings, DEFAULT_REFRESH_INTERVAL_S, MAX_ENDPOINT_LEN};
use crate::layout::{layout, LineColors};
use crate::traits::{Color, HttpSession, Panel};

/// Loop parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    /// URL returning the JSON line list
    pub endpoint: Option<String<MAX_ENDPOINT_LEN>>,
    /// Sleep between cycles, in seconds
    pub interval_s: u32,
    /// Color policy for drawn lines
    pub line_colors: LineColors,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            interval_s: DEFAULT_REFRESH_INTERVAL_S,
            line_colors: LineColors::default(),
        }
    }
}

impl From<&Settings> for RefreshConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            interval_s: settings.refresh_interval_s,
            line_colors: settings.line_colors,
        }
    }
}

impl RefreshConfig {
    /// Interval in milliseconds
    pub const fn interval_ms(&self) -> u32 {
        self.interval_s.saturating_mul(1000)
    }
}

/// Clear the panel and draw `lines` without pushing
///
/// Returns the number of lines drawn.
pub fn render<P: Panel>(panel: &mut P, lines: &Lines, colors: LineColors) -> Result<usize, P::Error> {
    panel.fill(Color::White)?;

    let mut drawn = 0;
    for line in layout(lines.iter(), colors) {
        debug!("Drawing '{}' at y={}", line.text, line.y);
        panel.text(line.text, line.x, line.y, line.color, line.size)?;
        drawn += 1;
    }

    Ok(drawn)
}

/// The device main loop
///
/// Owns the HTTP session, the panel and the delay source for the lifetime of
/// the process.
pub struct Refresher<S, P, D> {
    session: S,
    panel: P,
    delay: D,
    config: RefreshConfig,
    stats: RefreshStats,
}

impl<S, P, D> Refresher<S, P, D>
where
    S: HttpSession,
    P: Panel,
    D: DelayNs,
    S::Error: Debug,
    P::Error: Debug,
{
    pub fn new(session: S, panel: P, delay: D, config: RefreshConfig) -> Self {
        Self {
            session,
            panel,
            delay,
            config,
            stats: RefreshStats::new(),
        }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn stats(&self) -> RefreshStats {
        self.stats
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Fetch, decode, render and push once, without sleeping
    ///
    /// Returns the number of lines drawn.
    pub async fn run_cycle(&mut self) -> Result<usize, CycleError<S::Error, P::Error>> {
        let endpoint = self.config.endpoint.as_deref().ok_or(CycleError::NoEndpoint)?;

        info!("Fetching from {}", endpoint);
        let lines = {
            let response = self.session.get(endpoint).await.map_err(CycleError::Network)?;
            response.lines()?
        };
        info!("Received {} lines", lines.len());

        let drawn = render(&mut self.panel, &lines, self.config.line_colors).map_err(CycleError::Display)?;
        self.panel.display().await.map_err(CycleError::Display)?;

        Ok(drawn)
    }

    /// One loop iteration: a cycle followed by the interval sleep
    ///
    /// The sleep happens whether or not the cycle succeeded.
    pub async fn tick(&mut self) -> Result<usize, CycleError<S::Error, P::Error>> {
        let result = self.run_cycle().await;

        match &result {
            Ok(drawn) => {
                self.stats.record_success();
                info!("Display updated with {} lines", drawn);
            }
            Err(err) => {
                self.stats.record_failure();
                warn!(
                    "Refresh failed ({}): {} [{} failures, {} in a row]",
                    err.stage(),
                    err,
                    self.stats.failures,
                    self.stats.consecutive_failures
                );
            }
        }

        self.delay.delay_ms(self.config.interval_ms()).await;
        result
    }

    /// Run forever
    pub async fn run(&mut self) -> ! {
        info!("Refreshing every {} s", self.config.interval_s);
        loop {
            let _ = self.tick().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use embassy_futures::block_on;
    use transit_ink_protocol::{Method, ProtocolError, Response};

    const ENDPOINT: &str = "http://192.168.1.20:8080/";

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Reply {
        Ok(u16, &'static str),
        Fail,
    }

    /// Session serving queued replies and logging requested URLs
    #[derive(Default)]
    struct MockSession {
        replies: VecDeque<Reply>,
        requests: Vec<(Method, std::string::String)>,
        buffer: Vec<u8>,
    }

    impl MockSession {
        fn with(replies: &[Reply]) -> Self {
            Self {
                replies: replies.iter().cloned().collect(),
                ..Default::default()
            }
        }
    }

    impl HttpSession for MockSession {
        type Error = &'static str;

        async fn request(
            &mut self,
            method: Method,
            url: &str,
            _body: Option<&[u8]>,
        ) -> Result<Response<'_>, Self::Error> {
            self.requests.push((method, url.into()));
            match self.replies.pop_front() {
                Some(Reply::Ok(status, body)) => {
                    self.buffer.clear();
                    self.buffer.extend_from_slice(body.as_bytes());
                    Ok(Response::new(status, &self.buffer))
                }
                Some(Reply::Fail) | None => Err("connection reset"),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Fill(Color),
        Text(std::string::String, i32, i32, Color, u8),
        Display,
    }

    #[derive(Default)]
    struct MockPanel {
        calls: Vec<Call>,
        fail_display: bool,
    }

    impl Panel for MockPanel {
        type Error = u8;

        fn fill(&mut self, color: Color) -> Result<(), u8> {
            self.calls.push(Call::Fill(color));
            Ok(())
        }

        fn text(&mut self, text: &str, x: i32, y: i32, color: Color, size: u8) -> Result<(), u8> {
            self.calls.push(Call::Text(text.into(), x, y, color, size));
            Ok(())
        }

        async fn display(&mut self) -> Result<(), u8> {
            self.calls.push(Call::Display);
            if self.fail_display {
                Err(7)
            } else {
                Ok(())
            }
        }
    }

    /// Records every sleep instead of waiting
    #[derive(Default)]
    struct MockDelay {
        sleeps_ms: Vec<u32>,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.sleeps_ms.push(ns / 1_000_000);
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.sleeps_ms.push(ms);
        }
    }

    fn config() -> RefreshConfig {
        RefreshConfig {
            endpoint: Some(String::try_from(ENDPOINT).unwrap()),
            ..Default::default()
        }
    }

    fn refresher(replies: &[Reply]) -> Refresher<MockSession, MockPanel, MockDelay> {
        Refresher::new(
            MockSession::with(replies),
            MockPanel::default(),
            MockDelay::default(),
            config(),
        )
    }

    fn text_ys(calls: &[Call]) -> Vec<i32> {
        calls
            .iter()
            .filter_map(|c| match c {
                Call::Text(_, _, y, _, _) => Some(*y),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_cycle_draws_lines_at_offsets() {
        let body = r#"["Richmond","5, 20 min","Millbrae","12 min","Dublin"]"#;
        let mut refresher = refresher(&[Reply::Ok(200, body)]);

        let drawn = block_on(refresher.tick()).unwrap();
        assert_eq!(drawn, 5);

        let calls = &refresher.panel().calls;
        assert_eq!(calls.first(), Some(&Call::Fill(Color::White)));
        assert_eq!(calls.last(), Some(&Call::Display));
        assert_eq!(text_ys(calls), vec![10, 30, 70, 90, 130]);
        assert_eq!(
            calls[1],
            Call::Text("Richmond".into(), 10, 10, Color::Red, 2)
        );

        assert_eq!(
            refresher.session().requests,
            vec![(Method::Get, ENDPOINT.into())]
        );
        assert_eq!(refresher.delay.sleeps_ms, vec![180_000]);
        assert_eq!(refresher.stats().cycles, 1);
        assert_eq!(refresher.stats().failures, 0);
    }

    #[test]
    fn test_empty_array_still_clears_and_pushes() {
        let mut refresher = refresher(&[Reply::Ok(200, "[]")]);

        assert_eq!(block_on(refresher.tick()), Ok(0));
        assert_eq!(
            refresher.panel().calls,
            vec![Call::Fill(Color::White), Call::Display]
        );
    }

    #[test]
    fn test_bad_status_sleeps_then_fetches_once_more() {
        let mut refresher = refresher(&[
            Reply::Ok(503, "busy"),
            Reply::Ok(200, r#"["back"]"#),
        ]);

        assert_eq!(
            block_on(refresher.tick()),
            Err(CycleError::Protocol(ProtocolError::Status(503)))
        );
        assert!(refresher.panel().calls.is_empty());
        assert_eq!(refresher.session().requests.len(), 1);
        assert_eq!(refresher.delay.sleeps_ms, vec![180_000]);
        assert_eq!(refresher.stats().consecutive_failures, 1);

        assert_eq!(block_on(refresher.tick()), Ok(1));
        assert_eq!(refresher.session().requests.len(), 2);
        assert_eq!(refresher.delay.sleeps_ms, vec![180_000, 180_000]);
        assert_eq!(refresher.stats().consecutive_failures, 0);
        assert_eq!(refresher.stats().failures, 1);
    }

    #[test]
    fn test_malformed_json_is_a_cycle_failure() {
        let mut refresher = refresher(&[Reply::Ok(200, "not json"), Reply::Ok(200, "42")]);

        assert!(matches!(
            block_on(refresher.tick()),
            Err(CycleError::Protocol(ProtocolError::Json { .. }))
        ));
        assert!(matches!(
            block_on(refresher.tick()),
            Err(CycleError::Protocol(ProtocolError::Json { .. }))
        ));
        assert!(refresher.panel().calls.is_empty());
        assert_eq!(refresher.stats().failures, 2);
    }

    #[test]
    fn test_object_and_string_bodies_are_drawn() {
        let mut refresher = refresher(&[
            Reply::Ok(200, r#"{"Richmond": "5 min", "Dublin": "12 min"}"#),
            Reply::Ok(200, r#""ok""#),
        ]);

        assert_eq!(block_on(refresher.tick()), Ok(2));
        assert_eq!(
            refresher.panel().calls[1..3],
            [
                Call::Text("Richmond".into(), 10, 10, Color::Red, 2),
                Call::Text("Dublin".into(), 10, 30, Color::Red, 2),
            ]
        );

        refresher.panel.calls.clear();
        assert_eq!(block_on(refresher.tick()), Ok(2));
        assert_eq!(text_ys(&refresher.panel().calls), vec![10, 30]);
        assert_eq!(refresher.stats().failures, 0);
    }

    #[test]
    fn test_network_error_is_a_cycle_failure() {
        let mut refresher = refresher(&[Reply::Fail]);

        assert_eq!(
            block_on(refresher.tick()),
            Err(CycleError::Network("connection reset"))
        );
        assert_eq!(refresher.delay.sleeps_ms, vec![180_000]);
    }

    #[test]
    fn test_missing_endpoint_fails_every_cycle() {
        let mut refresher = Refresher::new(
            MockSession::default(),
            MockPanel::default(),
            MockDelay::default(),
            RefreshConfig::default(),
        );

        for _ in 0..3 {
            assert_eq!(block_on(refresher.tick()), Err(CycleError::NoEndpoint));
        }
        assert!(refresher.session().requests.is_empty());
        assert_eq!(refresher.delay.sleeps_ms.len(), 3);
        assert_eq!(refresher.stats().consecutive_failures, 3);
    }

    #[test]
    fn test_display_failure_is_a_cycle_failure() {
        let mut refresher = refresher(&[Reply::Ok(200, r#"["a"]"#)]);
        refresher.panel.fail_display = true;

        assert_eq!(block_on(refresher.tick()), Err(CycleError::Display(7)));
        assert_eq!(refresher.delay.sleeps_ms, vec![180_000]);
    }

    #[test]
    fn test_identical_responses_draw_identically() {
        let body = r#"["Richmond","5 min"]"#;
        let mut refresher = refresher(&[Reply::Ok(200, body), Reply::Ok(200, body)]);

        block_on(refresher.tick()).unwrap();
        let first = refresher.panel().calls.clone();
        refresher.panel.calls.clear();
        block_on(refresher.tick()).unwrap();

        assert_eq!(refresher.panel().calls, first);
    }

    #[test]
    fn test_custom_interval_and_colors() {
        let mut refresher = Refresher::new(
            MockSession::with(&[Reply::Ok(200, r#"["a","b"]"#)]),
            MockPanel::default(),
            MockDelay::default(),
            RefreshConfig {
                interval_s: 60,
                line_colors: LineColors::Alternating,
                ..config()
            },
        );

        block_on(refresher.tick()).unwrap();
        assert_eq!(refresher.delay.sleeps_ms, vec![60_000]);
        assert_eq!(
            refresher.panel().calls[1..3],
            [
                Call::Text("a".into(), 10, 10, Color::Black, 2),
                Call::Text("b".into(), 10, 30, Color::Red, 2),
            ]
        );
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings::parse(
            "WIFI_SSID = \"a\"\nWIFI_PASSWORD = \"b\"\nTRANSIT_ENDPOINT = \"http://x/\"\nREFRESH_INTERVAL = 90\n",
        )
        .unwrap();
        let config = RefreshConfig::from(&settings);

        assert_eq!(config.endpoint.as_deref(), Some("http://x/"));
        assert_eq!(config.interval_ms(), 90_000);
        assert_eq!(config.line_colors, LineColors::Highlight);
    }
}
