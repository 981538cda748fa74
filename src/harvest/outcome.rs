//! Targets and per-page outcome types

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// One concrete fetchable URL and the origin it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateTarget {
    /// Absolute URL to fetch
    pub full_url: String,

    /// Origin identifier as it appeared in the input list
    pub origin_id: String,
}

impl CandidateTarget {
    pub fn new(full_url: impl Into<String>, origin_id: impl Into<String>) -> Self {
        Self {
            full_url: full_url.into(),
            origin_id: origin_id.into(),
        }
    }
}

/// Why a request produced no response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestErrorKind {
    /// The per-request timeout elapsed
    Timeout,
    /// Connection refused, DNS or TLS failure
    Connect,
    /// Redirect limit or loop
    Redirect,
    /// Headers arrived but the body could not be read
    Body,
    /// Anything reqwest does not classify further
    Other,
}

impl fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Redirect => "redirect",
            Self::Body => "body",
            Self::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// HTTP status of a fetch, or the sentinel for a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Code(u16),
    RequestError(RequestErrorKind),
}

impl FetchStatus {
    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Code(code) if (200..300).contains(code))
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::RequestError(kind) => write!(f, "request error ({})", kind),
        }
    }
}

/// Raw result of one GET, before extraction
#[derive(Debug, Clone)]
pub struct PageFetch {
    pub status: FetchStatus,

    /// Response body; only kept for 2xx responses
    pub body: Option<String>,

    /// Length of the response body in bytes
    pub bytes_transferred: u64,

    /// Wall-clock time of the call, up to the failure point on errors
    pub elapsed: Duration,
}

impl PageFetch {
    /// A fetch that failed before a response was read
    pub fn failed(kind: RequestErrorKind, elapsed: Duration) -> Self {
        Self {
            status: FetchStatus::RequestError(kind),
            body: None,
            bytes_transferred: 0,
            elapsed,
        }
    }
}

/// Result of one fetch+extract unit, consumed once by aggregation
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub target: CandidateTarget,
    pub emails: BTreeSet<String>,
    pub status: FetchStatus,
    pub bytes_transferred: u64,
    pub elapsed: Duration,
}

impl FetchOutcome {
    /// Classifies the outcome for reporting
    pub fn kind(&self) -> OutcomeKind {
        match self.status {
            FetchStatus::RequestError(_) => OutcomeKind::NetworkFailure,
            status if !status.is_success() => OutcomeKind::NonSuccessStatus,
            _ if self.emails.is_empty() => OutcomeKind::ExtractionYieldsNothing,
            _ => OutcomeKind::Harvested,
        }
    }

    /// Transfer size in megabytes
    pub fn megabytes(&self) -> f64 {
        self.bytes_transferred as f64 / (1024.0 * 1024.0)
    }
}

/// How a single candidate ended up; none of these stop a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// 2xx page with at least one address
    Harvested,
    /// 2xx page with no matching addresses
    ExtractionYieldsNothing,
    /// Any non-2xx response; the body is not parsed
    NonSuccessStatus,
    /// Timeout, connection, DNS or TLS failure
    NetworkFailure,
    /// URL already dispatched earlier in the run; not fetched again
    DuplicateTarget,
}
