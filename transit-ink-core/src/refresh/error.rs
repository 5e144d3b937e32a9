//! Cycle errors

use core::fmt;

use transit_ink_protocol::ProtocolError;

/// Everything that can make a single refresh cycle fail
///
/// None of these escape the loop: the cycle is logged as failed and the
/// next one starts after the normal interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleError<N, D> {
    /// `TRANSIT_ENDPOINT` is not configured
    NoEndpoint,
    /// Transport failure from the HTTP session
    Network(N),
    /// Bad status or undecodable body
    Protocol(ProtocolError),
    /// Panel push failed
    Display(D),
}

impl<N, D> CycleError<N, D> {
    /// Short name of the failing stage
    pub const fn stage(&self) -> &'static str {
        match self {
            CycleError::NoEndpoint => "config",
            CycleError::Network(_) => "network",
            CycleError::Protocol(_) => "protocol",
            CycleError::Display(_) => "display",
        }
    }
}

impl<N, D> From<ProtocolError> for CycleError<N, D> {
    fn from(err: ProtocolError) -> Self {
        CycleError::Protocol(err)
    }
}

impl<N: fmt::Debug, D: fmt::Debug> fmt::Display for CycleError<N, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::NoEndpoint => f.write_str("no endpoint configured"),
            CycleError::Network(e) => write!(f, "network error: {:?}", e),
            CycleError::Protocol(e) => write!(f, "{}", e),
            CycleError::Display(e) => write!(f, "display error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<N: fmt::Debug, D: fmt::Debug> defmt::Format for CycleError<N, D> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            CycleError::NoEndpoint => defmt::write!(f, "no endpoint configured"),
            CycleError::Network(e) => defmt::write!(f, "network error: {}", defmt::Debug2Format(e)),
            CycleError::Protocol(e) => defmt::write!(f, "{}", e),
            CycleError::Display(e) => defmt::write!(f, "display error: {}", defmt::Debug2Format(e)),
        }
    }
}
