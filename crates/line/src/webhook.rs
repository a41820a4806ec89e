//! Webhook body parsing and normalization into [`InboundEvent`]s.

use {
    pttbot_common::{EventKind, EventSource, InboundEvent},
    serde::Deserialize,
    tracing::debug,
};

use crate::{error::LineError, signature};

#[derive(Debug, Deserialize)]
struct WebhookBody {
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    events: Vec<WireEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    reply_token: Option<String>,
    #[serde(default)]
    source: WireSource,
    #[serde(default)]
    message: Option<WireMessage>,
    #[serde(default)]
    postback: Option<WirePostback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSource {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    room_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WirePostback {
    #[serde(default)]
    data: String,
}

impl From<WireEvent> for InboundEvent {
    fn from(event: WireEvent) -> Self {
        let kind = match (event.kind.as_str(), event.message, event.postback) {
            ("message", Some(WireMessage { kind, text }), _) => match (kind.as_str(), text) {
                ("text", Some(text)) => EventKind::Text(text),
                _ => EventKind::Other(format!("message/{kind}")),
            },
            ("postback", _, Some(postback)) => EventKind::Postback(postback.data),
            _ => EventKind::Other(event.kind.clone()),
        };
        Self {
            reply_token: event.reply_token,
            source: EventSource {
                user_id: event.source.user_id,
                group_id: event.source.group_id,
                room_id: event.source.room_id,
            },
            kind,
        }
    }
}

/// Verify and decode a webhook request, preserving event order.
pub fn parse_request(
    channel_secret: &str,
    signature: Option<&str>,
    body: &[u8],
) -> Result<Vec<InboundEvent>, LineError> {
    signature::verify(channel_secret, signature, body)?;
    let body: WebhookBody = serde_json::from_slice(body)?;
    debug!(
        destination = body.destination.as_deref().unwrap_or_default(),
        events = body.events.len(),
        "webhook decoded"
    );
    Ok(body.events.into_iter().map(InboundEvent::from).collect())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::signature::sign};

    const SECRET: &str = "channel-secret";

    fn signed(body: &str) -> Result<Vec<InboundEvent>, LineError> {
        let signature = sign(SECRET, body.as_bytes()).unwrap();
        parse_request(SECRET, Some(&signature), body.as_bytes())
    }

    #[test]
    fn text_and_postback_events_in_order() {
        let body = r#"{
            "destination": "Ubot",
            "events": [
                {
                    "type": "message",
                    "replyToken": "r1",
                    "timestamp": 1700000000000,
                    "source": {"type": "user", "userId": "U1"},
                    "message": {"type": "text", "id": "m1", "text": "台北"}
                },
                {
                    "type": "postback",
                    "replyToken": "r2",
                    "source": {"type": "group", "groupId": "G1", "userId": "U2"},
                    "postback": {"data": "action=Newest&page=1"}
                }
            ]
        }"#;
        let events = signed(body).unwrap();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].reply_token.as_deref(), Some("r1"));
        assert_eq!(events[0].source.user_id.as_deref(), Some("U1"));
        assert_eq!(events[0].kind, EventKind::Text("台北".into()));

        assert_eq!(events[1].source.group_id.as_deref(), Some("G1"));
        assert_eq!(
            events[1].kind,
            EventKind::Postback("action=Newest&page=1".into())
        );
    }

    #[test]
    fn other_events_are_kept_as_other() {
        let body = r#"{"events": [
            {"type": "follow", "replyToken": "r", "source": {"type": "user", "userId": "U"}},
            {"type": "message", "replyToken": "r", "source": {"type": "room", "roomId": "R"},
             "message": {"type": "sticker", "id": "1", "packageId": "1", "stickerId": "2"}},
            {"type": "unsend", "source": {"type": "user", "userId": "U"}}
        ]}"#;
        let events = signed(body).unwrap();
        assert_eq!(events[0].kind, EventKind::Other("follow".into()));
        assert_eq!(events[1].kind, EventKind::Other("message/sticker".into()));
        assert_eq!(events[1].source.room_id.as_deref(), Some("R"));
        assert_eq!(events[2].reply_token, None);
    }

    #[test]
    fn incomplete_events_do_not_fail_the_batch() {
        let body = r#"{"events": [
            {"type": "postback", "replyToken": "r1", "source": {"type": "user", "userId": "U"},
             "postback": {"params": {"date": "2024-01-01"}}},
            {"replyToken": "r2"},
            {"type": "message", "replyToken": "r3", "message": {"id": "9"}},
            {"type": "message", "replyToken": "r4", "message": {"type": "text", "id": "1", "text": "台北"}}
        ]}"#;
        let events = signed(body).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].kind, EventKind::Postback(String::new()));
        assert_eq!(events[1].kind, EventKind::Other(String::new()));
        assert_eq!(events[2].kind, EventKind::Other("message/".into()));
        assert_eq!(events[3].kind, EventKind::Text("台北".into()));
    }

    #[test]
    fn empty_event_list() {
        assert!(signed(r#"{"destination": "U", "events": []}"#).unwrap().is_empty());
    }

    #[test]
    fn bad_signature_before_parsing() {
        let err = parse_request(SECRET, Some("AAAA"), b"not json").unwrap_err();
        assert!(err.is_invalid_signature());
        let err = parse_request(SECRET, None, b"{}").unwrap_err();
        assert!(err.is_invalid_signature());
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = signed("{\"events\": [").unwrap_err();
        assert!(matches!(err, LineError::Parse(_)));
    }
}
