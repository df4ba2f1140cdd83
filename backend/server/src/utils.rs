use axum::body::{Body, Bytes, to_bytes};

use crate::{
    error::AppError::{self, InvalidInput},
    models::{VotePayload, VoteRequest},
};

pub const MAX_VOTE_BODY_BYTES: usize = 1_048_576;

pub async fn read_capped_body(body: Body) -> Result<Bytes, AppError> {
    to_bytes(body, MAX_VOTE_BODY_BYTES)
        .await
        .map_err(|e| InvalidInput(format!("unreadable vote body: {e}")))
}

pub fn get_vote_from_bytes(bytes: &[u8]) -> Result<(VotePayload, VoteRequest), AppError> {
    if bytes.len() > MAX_VOTE_BODY_BYTES {
        return Err(InvalidInput(format!(
            "vote body exceeds {MAX_VOTE_BODY_BYTES} bytes"
        )));
    }

    let payload: VotePayload =
        serde_json::from_slice(bytes).map_err(|e| InvalidInput(format!("malformed vote: {e}")))?;

    Ok((payload, payload.into()))
}

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;

    #[test]
    fn test_valid_vote() {
        let (payload, request) = get_vote_from_bytes(br#"{"ID": 1, "Vote": true}"#).unwrap();

        assert_eq!(payload, VotePayload { id: 1, vote: true });
        assert_eq!(request.tip_id, 1);
        assert_eq!(request.direction, Direction::Up);
    }

    #[test]
    fn test_malformed_votes() {
        let bodies: [&[u8]; 5] = [
            b"not json",
            br#"{"ID": 1}"#,
            br#"{"Vote": true}"#,
            br#"{"ID": 1, "Vote": "up"}"#,
            b"",
        ];

        for body in bodies {
            assert!(matches!(get_vote_from_bytes(body), Err(InvalidInput(_))));
        }
    }

    #[test]
    fn test_oversized_vote() {
        let mut body = br#"{"ID": 1, "Vote": true}"#.to_vec();
        body.resize(MAX_VOTE_BODY_BYTES + 1, b' ');

        assert!(matches!(get_vote_from_bytes(&body), Err(InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_read_capped_body() {
        let small = read_capped_body(Body::from("{}")).await.unwrap();
        assert_eq!(&small[..], b"{}");

        let big = Body::from(vec![b' '; MAX_VOTE_BODY_BYTES + 1]);
        assert!(matches!(read_capped_body(big).await, Err(InvalidInput(_))));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Use a knife"), "Use a knife");
        assert_eq!(
            escape_html(r#"<b>"salt" & 'pepper'</b>"#),
            "&lt;b&gt;&#34;salt&#34; &amp; &#39;pepper&#39;&lt;/b&gt;"
        );
    }
}
