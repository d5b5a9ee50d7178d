use thiserror::Error;

mod candidate;
mod data;
mod render;

pub use candidate::{render_candidate, Candidate, CandidateKind, ParseProtocolError, Protocol};
pub use data::{Content, Description, Encryption, Feedback, Fingerprint, Group};
pub use data::{HeaderExtension, MediaType, Parameter, Payload, Session, Setup};
pub use data::{Source, SourceGroup, SourceParameter, Transport};
pub use render::{direction_token, render_media_section};
pub use render::{render_session, render_session_at};

/// Errors arising when rendering a session description.
#[derive(Debug, Error)]
pub enum SdpError {
    /// The input structure cannot be expressed as correct wire text.
    ///
    /// Rendering fails fast rather than emit partially-correct SDP.
    #[error("SDP inconsistent: {0}")]
    Inconsistent(String),
}
