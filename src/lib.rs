//! Serializer for Jingle-style session descriptions into SDP wire text.
//!
//! This is a Sans I/O building block: the crate does no network talking, holds
//! no state between calls and never reads the system clock in the core path.
//! The caller constructs a [`Session`] (typically deserialized from the JSON
//! form used in Jingle signaling), and the render functions turn it into the
//! CRLF-joined SDP blob a peer connection consumes as a local or remote
//! description.
//!
//! Three layers compose leaf to root, each a pure function of its input:
//!
//! * [`render_candidate`] — one ICE candidate as one attribute line.
//! * [`render_media_section`] — one content block (m-line and attributes).
//! * [`render_session`] — preamble, group lines and all media sections.
//!
//! There is no parser in this crate. Mapping SDP text back into structures is
//! a separate concern and deliberately not provided.
//!
//! # Usage
//!
//! ```
//! use jingle_sdp::{Content, Description, MediaType, Payload, Session};
//! use jingle_sdp::render_session_at;
//!
//! let session = Session {
//!     sid: Some("8923098".into()),
//!     time: None,
//!     groups: vec![],
//!     contents: vec![Content {
//!         name: "audio".into(),
//!         senders: Some("both".into()),
//!         description: Description {
//!             media: MediaType::Audio,
//!             payloads: vec![Payload {
//!                 id: 111,
//!                 name: "opus".into(),
//!                 clockrate: 48_000,
//!                 channels: Some(2),
//!                 parameters: vec![],
//!                 feedback: vec![],
//!             }],
//!             ..Description::default()
//!         },
//!         transport: None,
//!     }],
//! };
//!
//! // The current time is injected, which keeps output reproducible.
//! let sdp = render_session_at(&session, None, None, 1_687_000_000_000).unwrap();
//! assert!(sdp.starts_with("v=0\r\n"));
//! assert!(sdp.contains("m=audio 1 RTP/AVPF 111\r\n"));
//! ```
//!
//! # Defaults
//!
//! When the session carries no `sid`, and no override is given, the origin
//! line falls back to the injected timestamp. [`render_session`] is a
//! convenience wrapper that supplies wall-clock unix milliseconds; tests and
//! deterministic callers should prefer [`render_session_at`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod sdp;

pub use sdp::{Candidate, CandidateKind, ParseProtocolError, Protocol};
pub use sdp::{Content, Description, Encryption, Feedback, Fingerprint, Group};
pub use sdp::{HeaderExtension, MediaType, Parameter, Payload, Session, Setup};
pub use sdp::{Source, SourceGroup, SourceParameter, Transport};

pub use sdp::SdpError;
pub use sdp::{direction_token, render_candidate, render_media_section};
pub use sdp::{render_session, render_session_at};
