//! ICE candidate lines.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One ICE connectivity candidate as carried in signaling.
///
/// This is a plain input structure; the caller fills in the fields and the
/// renderer turns them into a single `a=candidate:` attribute line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Foundation string grouping similar candidates, 1-32 ice-chars.
    pub foundation: String,

    /// Component id: 1 for RTP, 2 for RTCP.
    pub component: u16,

    /// Transport protocol of the candidate.
    pub protocol: Protocol,

    /// Candidate priority, 1 to 2^31 - 1.
    pub priority: u32,

    /// The address to connect to.
    pub ip: IpAddr,

    /// The port to connect to.
    pub port: u16,

    /// Candidate type: host, srflx, prflx or relay.
    #[serde(rename = "type")]
    pub kind: CandidateKind,

    /// Related address, only meaningful for non-host candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_addr: Option<IpAddr>,

    /// Related port, only meaningful for non-host candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_port: Option<u16>,

    /// ICE restart generation. Absent renders as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u32>,
}

impl Candidate {
    /// Generates the candidate attribute value, without the `a=` prefix.
    ///
    /// The raddr/rport segment is only written for non-host candidates that
    /// carry both related fields. Host candidates have no related address by
    /// definition, so the segment is suppressed for them even when the
    /// fields are populated.
    pub fn to_sdp_string(&self) -> String {
        let mut s = format!(
            "candidate:{} {} {} {} {} {} typ {}",
            self.foundation,
            self.component,
            self.protocol,
            self.priority,
            self.ip,
            self.port,
            self.kind
        );
        if self.kind != CandidateKind::Host {
            if let (Some(raddr), Some(rport)) = (&self.rel_addr, self.rel_port) {
                s.push_str(&format!(" raddr {} rport {}", raddr, rport));
            }
        }
        // An explicit generation 0 and an absent one print the same, but
        // only the absent case is a substitution.
        s.push_str(&format!(" generation {}", self.generation.unwrap_or(0)));
        s
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sdp_string())
    }
}

/// Renders one candidate as a complete attribute line (no line terminator).
pub fn render_candidate(candidate: &Candidate) -> String {
    format!("a={}", candidate.to_sdp_string())
}

/// Type of candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateKind {
    /// Host (local network interface)
    #[serde(rename = "host")]
    Host,
    /// Prflx (Peer reflexive)
    #[serde(rename = "prflx")]
    PeerReflexive,
    /// Srflx (STUN)
    #[serde(rename = "srflx")]
    ServerReflexive,
    /// Relay (TURN)
    #[serde(rename = "relay")]
    Relayed,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            CandidateKind::Host => "host",
            CandidateKind::PeerReflexive => "prflx",
            CandidateKind::ServerReflexive => "srflx",
            CandidateKind::Relayed => "relay",
        };
        write!(f, "{x}")
    }
}

/// Transport protocol of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// UDP
    Udp,
    /// TCP (See RFC 4571 for framing)
    Tcp,
    /// TCP with fixed SSL Hello Exchange
    SslTcp,
    /// TLS (only used via relay)
    Tls,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            Protocol::Udp => "udp",
            Protocol::Tcp => "tcp",
            Protocol::SslTcp => "ssltcp",
            Protocol::Tls => "tls",
        };
        write!(f, "{x}")
    }
}

/// Failure to interpret a protocol token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProtocolError;

impl fmt::Display for ParseProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid protocol (expected: udp, tcp, ssltcp or tls)")
    }
}

impl std::error::Error for ParseProtocolError {}

impl FromStr for Protocol {
    type Err = ParseProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_lowercase()[..] {
            "udp" => Ok(Protocol::Udp),
            "tcp" => Ok(Protocol::Tcp),
            "ssltcp" => Ok(Protocol::SslTcp),
            "tls" => Ok(Protocol::Tls),
            _ => Err(ParseProtocolError),
        }
    }
}
