//! Session and media-section rendering.
//!
//! Emission order inside a media section is a wire-format requirement, not a
//! stylistic choice. Lines are joined with CRLF; the complete session blob
//! ends with one trailing CRLF, individual media sections carry none.

use std::time::{SystemTime, UNIX_EPOCH};

use super::{Content, Session};
use crate::SdpError;

/// Translates a sender role to its wire direction token.
///
/// Semantic roles map to their directions, already-wire-form tokens pass
/// through unchanged, and anything unrecognized falls back to `sendrecv`.
pub fn direction_token(role: &str) -> &'static str {
    match role {
        "initiator" | "sendonly" => "sendonly",
        "responder" | "recvonly" => "recvonly",
        "both" | "sendrecv" => "sendrecv",
        "none" | "inactive" => "inactive",
        _ => {
            trace!("Unknown sender role, using sendrecv: {}", role);
            "sendrecv"
        }
    }
}

/// Renders the complete session description.
///
/// Convenience wrapper over [`render_session_at`] that uses the wall clock
/// for the timestamp defaults of the o= line.
pub fn render_session(
    session: &Session,
    sid: Option<&str>,
    time: Option<&str>,
) -> Result<String, SdpError> {
    render_session_at(session, sid, time, unix_time_millis())
}

/// Renders the complete session description with an injected clock value.
///
/// `sid` takes precedence over `session.sid`, which takes precedence over
/// `now_millis`; `time` takes precedence over `now_millis`. Output for a
/// fixed `now_millis` is deterministic.
pub fn render_session_at(
    session: &Session,
    sid: Option<&str>,
    time: Option<&str>,
    now_millis: u64,
) -> Result<String, SdpError> {
    let now = now_millis.to_string();
    let sid = sid.or(session.sid.as_deref()).unwrap_or(&now);
    let time = time.unwrap_or(&now);

    let mut lines = vec![
        "v=0".to_string(),
        format!("o=- {} {} IN IP4 0.0.0.0", sid, time),
        "s=-".to_string(),
        "t=0 0".to_string(),
    ];

    for group in &session.groups {
        lines.push(format!(
            "a=group:{} {}",
            group.semantics,
            group.contents.join(" ")
        ));
    }

    for content in &session.contents {
        lines.push(render_media_section(content)?);
    }

    let mut sdp = lines.join("\r\n");
    sdp.push_str("\r\n");
    Ok(sdp)
}

/// Renders one media content block, CRLF-joined with no trailing CRLF.
pub fn render_media_section(content: &Content) -> Result<String, SdpError> {
    let desc = &content.description;
    let transport = content.transport.as_ref();
    let fingerprints = transport.map(|t| &t.fingerprints[..]).unwrap_or(&[]);

    let mut mline = vec![desc.media.to_string(), "1".to_string()];

    // Secure profile is derived, not declared: the presence of any crypto
    // attribute anywhere in the content selects SAVPF.
    if !desc.encryption.is_empty() || !fingerprints.is_empty() {
        mline.push("RTP/SAVPF".to_string());
    } else {
        mline.push("RTP/AVPF".to_string());
    }
    for payload in &desc.payloads {
        mline.push(payload.id.to_string());
    }

    let mut lines = vec![format!("m={}", mline.join(" "))];

    lines.push("c=IN IP4 0.0.0.0".to_string());
    lines.push("a=rtcp:1 IN IP4 0.0.0.0".to_string());

    if let Some(transport) = transport {
        if let Some(ufrag) = non_empty(&transport.ufrag) {
            lines.push(format!("a=ice-ufrag:{ufrag}"));
        }
        if let Some(pwd) = non_empty(&transport.pwd) {
            lines.push(format!("a=ice-pwd:{pwd}"));
        }
        if let Some(setup) = transport.setup {
            lines.push(format!("a=setup:{}", setup.setup_line()));
        }
        for fp in fingerprints {
            lines.push(format!("a=fingerprint:{} {}", fp.hash, fp.value));
        }
    }

    let direction = content.senders.as_deref().map_or("sendrecv", direction_token);
    lines.push(format!("a={direction}"));
    lines.push(format!("a=mid:{}", content.name));

    if desc.mux {
        lines.push("a=rtcp-mux".to_string());
    }

    for crypto in &desc.encryption {
        let mut line = format!(
            "a=crypto:{} {} {}",
            crypto.tag, crypto.cipher_suite, crypto.key_params
        );
        if let Some(session_params) = &crypto.session_params {
            line.push(' ');
            line.push_str(session_params);
        }
        lines.push(line);
    }

    for payload in &desc.payloads {
        let mut rtpmap = format!(
            "a=rtpmap:{} {}/{}",
            payload.id, payload.name, payload.clockrate
        );
        // Mono is the implied default and is never written out.
        match payload.channels {
            Some(1) | None => {}
            Some(channels) => rtpmap.push_str(&format!("/{channels}")),
        }
        lines.push(rtpmap);

        if !payload.parameters.is_empty() {
            let mut fmtp = format!("a=fmtp:{}", payload.id);
            for param in &payload.parameters {
                fmtp.push(' ');
                if let Some(key) = &param.key {
                    fmtp.push_str(key);
                    fmtp.push('=');
                }
                fmtp.push_str(&param.value);
            }
            lines.push(fmtp);
        }

        for fb in &payload.feedback {
            lines.push(format!("a=rtcp-fb:{} {}", payload.id, fb));
        }
    }

    for fb in &desc.feedback {
        lines.push(format!("a=rtcp-fb:* {fb}"));
    }

    for ext in &desc.header_extensions {
        let mut line = format!("a=extmap:{}", ext.id);
        if let Some(role) = &ext.senders {
            line.push('/');
            line.push_str(direction_token(role));
        }
        line.push(' ');
        line.push_str(&ext.uri);
        lines.push(line);
    }

    for group in &desc.source_groups {
        let ssrcs: Vec<_> = group.sources.iter().map(|s| s.to_string()).collect();
        lines.push(format!("a=ssrc-group:{} {}", group.semantics, ssrcs.join(" ")));
    }

    for source in &desc.sources {
        let ssrc = source.ssrc.or(desc.ssrc).ok_or_else(|| {
            SdpError::Inconsistent(format!(
                "a=ssrc source without ssrc value for mid: {}",
                content.name
            ))
        })?;
        for param in &source.parameters {
            let mut line = format!("a=ssrc:{} {}", ssrc, param.key);
            if let Some(value) = &param.value {
                line.push(':');
                line.push_str(value);
            }
            lines.push(line);
        }
    }

    if let Some(transport) = transport {
        for candidate in &transport.candidates {
            lines.push(format!("a={}", candidate.to_sdp_string()));
        }
    }

    Ok(lines.join("\r\n"))
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn unix_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        Candidate, CandidateKind, Description, Encryption, Feedback, Fingerprint, HeaderExtension,
        MediaType, Parameter, Payload, Protocol, Source, SourceGroup, SourceParameter, Transport,
    };

    fn opus() -> Payload {
        Payload {
            id: 111,
            name: "opus".into(),
            clockrate: 48_000,
            channels: Some(2),
            parameters: vec![],
            feedback: vec![],
        }
    }

    fn audio_content() -> Content {
        Content {
            name: "audio".into(),
            senders: Some("both".into()),
            description: Description {
                media: MediaType::Audio,
                payloads: vec![opus()],
                ..Description::default()
            },
            transport: None,
        }
    }

    fn fingerprint() -> Fingerprint {
        Fingerprint {
            hash: "sha-256".into(),
            value: "8C:64:ED:03:76:D0:3D:B4".into(),
        }
    }

    #[test]
    fn direction_tokens() {
        assert_eq!(direction_token("initiator"), "sendonly");
        assert_eq!(direction_token("responder"), "recvonly");
        assert_eq!(direction_token("both"), "sendrecv");
        assert_eq!(direction_token("none"), "inactive");
        // Already-wire-form tokens pass through unchanged.
        assert_eq!(direction_token("sendonly"), "sendonly");
        assert_eq!(direction_token("recvonly"), "recvonly");
        assert_eq!(direction_token("sendrecv"), "sendrecv");
        assert_eq!(direction_token("inactive"), "inactive");
        assert_eq!(direction_token("bogus"), "sendrecv");
    }

    #[test]
    fn audio_section_without_transport() {
        let sdp = render_media_section(&audio_content()).unwrap();
        let lines: Vec<_> = sdp.split("\r\n").collect();

        assert_eq!(lines[0], "m=audio 1 RTP/AVPF 111");
        assert_eq!(lines[1], "c=IN IP4 0.0.0.0");
        assert_eq!(lines[2], "a=rtcp:1 IN IP4 0.0.0.0");
        assert!(lines.contains(&"a=sendrecv"));
        assert!(lines.contains(&"a=mid:audio"));
        assert!(lines.contains(&"a=rtpmap:111 opus/48000/2"));
        assert!(!sdp.contains("candidate"));
        assert!(!sdp.contains("fingerprint"));
        assert!(!sdp.ends_with("\r\n"));
    }

    #[test]
    fn fingerprint_selects_secure_profile() {
        let mut content = audio_content();
        content.transport = Some(Transport {
            fingerprints: vec![fingerprint()],
            ..Transport::default()
        });
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.starts_with("m=audio 1 RTP/SAVPF 111\r\n"));
        assert!(sdp.contains("a=fingerprint:sha-256 8C:64:ED:03:76:D0:3D:B4"));
    }

    #[test]
    fn encryption_selects_secure_profile() {
        let mut content = audio_content();
        content.description.encryption = vec![Encryption {
            tag: 1,
            cipher_suite: "AES_CM_128_HMAC_SHA1_80".into(),
            key_params: "inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR".into(),
            session_params: None,
        }];
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.starts_with("m=audio 1 RTP/SAVPF 111\r\n"));
        assert!(sdp.contains(
            "a=crypto:1 AES_CM_128_HMAC_SHA1_80 \
             inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR"
        ));
    }

    #[test]
    fn crypto_session_params_segment() {
        let mut content = audio_content();
        content.description.encryption = vec![Encryption {
            tag: 2,
            cipher_suite: "AES_CM_128_HMAC_SHA1_32".into(),
            key_params: "inline:abc".into(),
            session_params: Some("KDR=1".into()),
        }];
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.contains("a=crypto:2 AES_CM_128_HMAC_SHA1_32 inline:abc KDR=1"));
    }

    #[test]
    fn mono_channels_not_written() {
        let mut content = audio_content();
        content.description.payloads = vec![
            Payload {
                id: 0,
                name: "PCMU".into(),
                clockrate: 8_000,
                channels: Some(1),
                parameters: vec![],
                feedback: vec![],
            },
            Payload {
                id: 9,
                name: "G722".into(),
                clockrate: 8_000,
                channels: None,
                parameters: vec![],
                feedback: vec![],
            },
        ];
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.contains("m=audio 1 RTP/AVPF 0 9\r\n"));
        assert!(sdp.contains("a=rtpmap:0 PCMU/8000\r\n"));
        assert!(sdp.ends_with("a=rtpmap:9 G722/8000"));
    }

    #[test]
    fn fmtp_keyed_and_bare_parameters() {
        let mut content = audio_content();
        content.description.payloads[0].parameters = vec![
            Parameter {
                key: Some("minptime".into()),
                value: "10".into(),
            },
            Parameter {
                key: None,
                value: "useinbandfec=1".into(),
            },
        ];
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.contains("a=fmtp:111 minptime=10 useinbandfec=1"));
    }

    #[test]
    fn trr_int_zero_is_significant() {
        let mut content = audio_content();
        content.description.payloads[0].feedback = vec![Feedback::TrrInt(Some(0))];
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.contains("a=rtcp-fb:111 trr-int 0"));

        // Truly absent values substitute the same default.
        content.description.payloads[0].feedback = vec![Feedback::TrrInt(None)];
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.contains("a=rtcp-fb:111 trr-int 0"));
    }

    #[test]
    fn description_feedback_uses_wildcard() {
        let mut content = audio_content();
        content.description.feedback = vec![
            Feedback::Other {
                kind: "nack".into(),
                subtype: Some("pli".into()),
            },
            Feedback::Other {
                kind: "goog-remb".into(),
                subtype: None,
            },
        ];
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.contains("a=rtcp-fb:* nack pli\r\n"));
        assert!(sdp.ends_with("a=rtcp-fb:* goog-remb"));
    }

    #[test]
    fn extmap_direction_segment() {
        let mut content = audio_content();
        content.description.header_extensions = vec![
            HeaderExtension {
                id: 1,
                uri: "urn:ietf:params:rtp-hdrext:ssrc-audio-level".into(),
                senders: None,
            },
            HeaderExtension {
                id: 2,
                uri: "urn:example:ext".into(),
                senders: Some("initiator".into()),
            },
        ];
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.contains("a=extmap:1 urn:ietf:params:rtp-hdrext:ssrc-audio-level\r\n"));
        assert!(sdp.contains("a=extmap:2/sendonly urn:example:ext"));
    }

    #[test]
    fn source_lines_fall_back_to_description_ssrc() {
        let mut content = audio_content();
        content.description.ssrc = Some(3_948_621_874);
        content.description.source_groups = vec![SourceGroup {
            semantics: "FID".into(),
            sources: vec![659_652_645, 98_148_385],
        }];
        content.description.sources = vec![Source {
            ssrc: None,
            parameters: vec![
                SourceParameter {
                    key: "cname".into(),
                    value: Some("xeXs3aE9AOBn00yJ".into()),
                },
                SourceParameter {
                    key: "mslabel".into(),
                    value: None,
                },
            ],
        }];
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp.contains("a=ssrc-group:FID 659652645 98148385\r\n"));
        assert!(sdp.contains("a=ssrc:3948621874 cname:xeXs3aE9AOBn00yJ\r\n"));
        assert!(sdp.ends_with("a=ssrc:3948621874 mslabel"));
    }

    #[test]
    fn source_without_any_ssrc_fails_fast() {
        let mut content = audio_content();
        content.description.sources = vec![Source {
            ssrc: None,
            parameters: vec![SourceParameter {
                key: "cname".into(),
                value: Some("x".into()),
            }],
        }];
        let err = render_media_section(&content).unwrap_err();
        assert_eq!(
            err.to_string(),
            "SDP inconsistent: a=ssrc source without ssrc value for mid: audio"
        );
    }

    #[test]
    fn empty_ice_credentials_emit_nothing() {
        let mut content = audio_content();
        content.transport = Some(Transport {
            ufrag: Some(String::new()),
            pwd: None,
            ..Transport::default()
        });
        let sdp = render_media_section(&content).unwrap();
        assert!(!sdp.contains("ice-ufrag"));
        assert!(!sdp.contains("ice-pwd"));
    }

    #[test]
    fn no_transport_no_candidates() {
        // Candidate emission is gated on the transport being present, so a
        // content without one renders cleanly instead of faulting.
        let sdp = render_media_section(&audio_content()).unwrap();
        assert!(!sdp.contains("a=candidate"));

        let mut content = audio_content();
        content.transport = Some(Transport {
            candidates: vec![Candidate {
                foundation: "1".into(),
                component: 1,
                protocol: Protocol::Udp,
                priority: 2_130_706_431,
                ip: "10.0.0.1".parse().unwrap(),
                port: 54_321,
                kind: CandidateKind::Host,
                rel_addr: None,
                rel_port: None,
                generation: None,
            }],
            ..Transport::default()
        });
        let sdp = render_media_section(&content).unwrap();
        assert!(sdp
            .ends_with("a=candidate:1 1 udp 2130706431 10.0.0.1 54321 typ host generation 0"));
    }

    #[test]
    fn session_defaults_from_injected_clock() {
        let session = Session {
            contents: vec![audio_content()],
            ..Session::default()
        };
        let sdp = render_session_at(&session, None, None, 1_687_000_000_000).unwrap();
        assert!(sdp.contains("o=- 1687000000000 1687000000000 IN IP4 0.0.0.0\r\n"));

        // Same input, same clock, byte-identical output.
        let again = render_session_at(&session, None, None, 1_687_000_000_000).unwrap();
        assert_eq!(sdp, again);
    }

    #[test]
    fn session_override_precedence() {
        let session = Session {
            sid: Some("12345".into()),
            ..Session::default()
        };

        let sdp = render_session_at(&session, None, None, 99).unwrap();
        assert!(sdp.contains("o=- 12345 99 IN IP4 0.0.0.0"));

        let sdp = render_session_at(&session, Some("777"), Some("888"), 99).unwrap();
        assert!(sdp.contains("o=- 777 888 IN IP4 0.0.0.0"));
    }

    #[test]
    fn session_groups_and_trailing_crlf() {
        let session = Session {
            sid: Some("1".into()),
            time: None,
            groups: vec![crate::Group {
                semantics: "BUNDLE".into(),
                contents: vec!["audio".into(), "video".into()],
            }],
            contents: vec![audio_content()],
        };
        let sdp = render_session_at(&session, None, Some("2"), 0).unwrap();
        assert!(sdp.starts_with(
            "v=0\r\n\
             o=- 1 2 IN IP4 0.0.0.0\r\n\
             s=-\r\n\
             t=0 0\r\n\
             a=group:BUNDLE audio video\r\n\
             m=audio 1 RTP/AVPF 111\r\n"
        ));
        assert!(sdp.ends_with("\r\n"));
        assert!(!sdp.ends_with("\r\n\r\n"));
    }
}
