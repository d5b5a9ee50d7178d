//! Data model for a Jingle-style session description.
//!
//! These are plain input structures. The render functions only read them;
//! nothing here is mutated or retained past a call. The serde shapes follow
//! the JSON form used in Jingle signaling (camelCase keys, sparse objects).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;

/// A whole multimedia session: groups plus media contents.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session id for the o= line. Defaults to a timestamp when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// Session time as carried in signaling.
    ///
    /// The o= line does not consult this; it uses the explicit override or
    /// the injected clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Bundle/grouping declarations, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,

    /// Media contents, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<Content>,
}

/// Grouping declaration, e.g. BUNDLE over a set of content names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group semantics tag, i.e. "BUNDLE" or "LS".
    pub semantics: String,
    /// Names of the contents belonging to the group, in order.
    pub contents: Vec<String>,
}

/// One media content: an m-line worth of description plus transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Content name, emitted as a=mid.
    pub name: String,

    /// Sender role: "initiator", "responder", "both", "none" or an
    /// already-wire-form direction token. Unrecognized or absent roles
    /// render as sendrecv.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senders: Option<String>,

    /// The media description. Always present.
    pub description: Description,

    /// Transport for this content. When absent, no ICE, fingerprint or
    /// candidate lines are emitted at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,
}

/// Media description: codecs, header extensions, sources.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    /// Media kind of the m-line.
    pub media: MediaType,

    /// Codec payloads, in m-line order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payloads: Vec<Payload>,

    /// Whether RTP and RTCP are multiplexed on one port (a=rtcp-mux).
    #[serde(default)]
    pub mux: bool,

    /// Legacy SDES crypto lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encryption: Vec<Encryption>,

    /// Description-level RTCP feedback, emitted against the wildcard
    /// payload `*`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<Feedback>,

    /// RTP header extensions (a=extmap).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_extensions: Vec<HeaderExtension>,

    /// Ssrc groupings, e.g. FID or SIM.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_groups: Vec<SourceGroup>,

    /// Per-ssrc parameter sets (a=ssrc lines).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,

    /// Default ssrc for sources that don't carry their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssrc: Option<u32>,
}

/// "audio", "video", "application"
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    /// Audio media.
    #[default]
    Audio,
    /// Video media.
    Video,
    /// Application media, e.g. data channels.
    Application,
    /// Any other media kind, passed through as-is.
    Unknown(String),
}

impl From<String> for MediaType {
    fn from(v: String) -> Self {
        match v.as_str() {
            "audio" => MediaType::Audio,
            "video" => MediaType::Video,
            "application" => MediaType::Application,
            _ => MediaType::Unknown(v),
        }
    }
}

impl From<MediaType> for String {
    fn from(v: MediaType) -> Self {
        v.to_string()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Audio => write!(f, "audio"),
            MediaType::Video => write!(f, "video"),
            MediaType::Application => write!(f, "application"),
            MediaType::Unknown(v) => write!(f, "{v}"),
        }
    }
}

/// One codec payload type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Payload type id, 0-127.
    pub id: u8,
    /// Codec name, e.g. "opus".
    pub name: String,
    /// Clock rate in Hz.
    pub clockrate: u32,
    /// Channel count. A count of exactly 1 is omitted from the rtpmap line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    /// Format parameters for the a=fmtp line, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Payload-specific RTCP feedback.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<Feedback>,
}

/// One fmtp parameter, rendered `key=value` or bare `value` when keyless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter key. Keyless parameters render just the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Parameter value.
    pub value: String,
}

/// RTCP feedback entry on a payload or on the whole description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FeedbackRepr", into = "FeedbackRepr")]
pub enum Feedback {
    /// Minimum regular RTCP interval, `trr-int <ms>`.
    ///
    /// An explicit zero is significant; only a truly absent value falls
    /// back to 0 on the wire.
    TrrInt(Option<u32>),

    /// Any other feedback mechanism, e.g. `nack pli` or `ccm fir`.
    Other {
        /// Feedback type token.
        kind: String,
        /// Optional subtype token.
        subtype: Option<String>,
    },
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::TrrInt(v) => write!(f, "trr-int {}", v.unwrap_or(0)),
            Feedback::Other { kind, subtype } => {
                write!(f, "{kind}")?;
                if let Some(s) = subtype {
                    write!(f, " {s}")?;
                }
                Ok(())
            }
        }
    }
}

// Wire shape of a feedback entry in Jingle JSON: {type, subtype?, value?}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRepr {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<u32>,
}

impl From<FeedbackRepr> for Feedback {
    fn from(v: FeedbackRepr) -> Self {
        if v.kind == "trr-int" {
            Feedback::TrrInt(v.value)
        } else {
            Feedback::Other {
                kind: v.kind,
                subtype: v.subtype,
            }
        }
    }
}

impl From<Feedback> for FeedbackRepr {
    fn from(v: Feedback) -> Self {
        match v {
            Feedback::TrrInt(value) => FeedbackRepr {
                kind: "trr-int".into(),
                subtype: None,
                value,
            },
            Feedback::Other { kind, subtype } => FeedbackRepr {
                kind,
                subtype,
                value: None,
            },
        }
    }
}

/// Legacy SDES crypto parameters for one a=crypto line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encryption {
    /// Crypto tag, a small decimal id.
    pub tag: u32,
    /// Cipher suite, e.g. "AES_CM_128_HMAC_SHA1_80".
    pub cipher_suite: String,
    /// Key parameters, e.g. "inline:...".
    pub key_params: String,
    /// Optional session parameters segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_params: Option<String>,
}

/// RTP header extension declaration for one a=extmap line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderExtension {
    /// Extension id, 1-14.
    pub id: u16,
    /// Extension URI.
    pub uri: String,
    /// Optional sender role, translated via the direction token table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senders: Option<String>,
}

/// Ssrc grouping, e.g. `a=ssrc-group:FID 659652645 98148385`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceGroup {
    /// Group semantics, i.e. "FID" or "SIM".
    pub semantics: String,
    /// The grouped ssrc ids, in order.
    pub sources: Vec<u32>,
}

/// Parameters attached to one synchronization source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// The ssrc id. Falls back to the description default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssrc: Option<u32>,
    /// Key/value parameters, one a=ssrc line each, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<SourceParameter>,
}

/// One ssrc parameter, rendered `key` or `key:value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceParameter {
    /// Parameter key, e.g. "cname" or "msid".
    pub key: String,
    /// Optional value. Absent values render the bare key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// ICE/DTLS transport for one content.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    /// ICE username fragment. Empty or absent emits no line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ufrag: Option<String>,
    /// ICE password. Empty or absent emits no line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwd: Option<String>,
    /// DTLS setup role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Setup>,
    /// Certificate fingerprints, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fingerprints: Vec<Fingerprint>,
    /// Connectivity candidates, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
}

/// DTLS setup role: active, passive, actpass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Setup {
    /// Either side may initiate.
    #[default]
    ActPass,
    /// This side initiates the DTLS handshake.
    Active,
    /// This side waits for the handshake.
    Passive,
}

impl Setup {
    /// The token as written on the a=setup line.
    pub fn setup_line(&self) -> &str {
        match self {
            Setup::ActPass => "actpass",
            Setup::Active => "active",
            Setup::Passive => "passive",
        }
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.setup_line())
    }
}

/// Certificate fingerprint as carried in signaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    /// Hash function, e.g. "sha-256".
    pub hash: String,
    /// Colon-separated hex digest, already formatted.
    pub value: String,
}
