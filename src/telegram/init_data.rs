//! Telegram Mini App `initData` handling.
//!
//! `initData` is a URL-encoded query string. The `user` field carries a JSON
//! object, and `hash` signs every other field with a key derived from the
//! bot token.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebAppUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum InitDataError {
    #[error("initData has no user field")]
    MissingUser,
    #[error("malformed user field: {0}")]
    MalformedUser(#[from] serde_json::Error),
    #[error("initData has no hash field")]
    MissingHash,
    #[error("initData signature mismatch")]
    BadSignature,
}

/// Extracts the user object from `initData`.
pub fn parse_user(init_data: &str) -> Result<WebAppUser, InitDataError> {
    let user = url::form_urlencoded::parse(init_data.as_bytes())
        .find(|(key, _)| key == "user")
        .map(|(_, value)| value.into_owned())
        .ok_or(InitDataError::MissingUser)?;
    Ok(serde_json::from_str(&user)?)
}

/// Checks the `hash` field against the bot token.
pub fn verify(init_data: &str, bot_token: &str) -> Result<(), InitDataError> {
    let mut hash = None;
    let mut fields = Vec::new();
    for (key, value) in url::form_urlencoded::parse(init_data.as_bytes()) {
        if key == "hash" {
            hash = Some(value.into_owned());
        } else {
            fields.push((key.into_owned(), value.into_owned()));
        }
    }
    let hash = hash.ok_or(InitDataError::MissingHash)?;
    let expected = decode_hex(&hash).ok_or(InitDataError::BadSignature)?;

    sign(&data_check_string(fields), bot_token)?
        .verify_slice(&expected)
        .map_err(|_| InitDataError::BadSignature)
}

fn data_check_string(mut fields: Vec<(String, String)>) -> String {
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn sign(data_check: &str, bot_token: &str) -> Result<HmacSha256, InitDataError> {
    let mut secret =
        HmacSha256::new_from_slice(b"WebAppData").map_err(|_| InitDataError::BadSignature)?;
    secret.update(bot_token.as_bytes());
    let secret_key = secret.finalize().into_bytes();

    let mut mac =
        HmacSha256::new_from_slice(&secret_key).map_err(|_| InitDataError::BadSignature)?;
    mac.update(data_check.as_bytes());
    Ok(mac)
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "123456:TEST-TOKEN";

    fn encode(pairs: &[(&str, &str)]) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }

    fn signed(pairs: &[(&str, &str)]) -> String {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let digest = sign(&data_check_string(fields), TOKEN)
            .unwrap()
            .finalize()
            .into_bytes();
        let hash: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        let mut all = pairs.to_vec();
        all.push(("hash", hash.as_str()));
        encode(&all)
    }

    #[test]
    fn parses_user_with_name() {
        let data = encode(&[("user", r#"{"id":12345,"first_name":"Test"}"#)]);
        let user = parse_user(&data).unwrap();
        assert_eq!(user.id, 12345);
        assert_eq!(user.first_name.as_deref(), Some("Test"));
    }

    #[test]
    fn parses_user_without_name() {
        let data = encode(&[("auth_date", "1700000000"), ("user", r#"{"id":7}"#)]);
        let user = parse_user(&data).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.first_name, None);
    }

    #[test]
    fn rejects_missing_user() {
        let err = parse_user("auth_date=1700000000").unwrap_err();
        assert!(matches!(err, InitDataError::MissingUser));
    }

    #[test]
    fn rejects_id_that_does_not_fit_i64() {
        let data = encode(&[("user", r#"{"id":9223372036854775808}"#)]);
        assert!(matches!(
            parse_user(&data),
            Err(InitDataError::MalformedUser(_))
        ));
    }

    #[test]
    fn rejects_user_without_id() {
        let data = encode(&[("user", r#"{"first_name":"Anon"}"#)]);
        assert!(parse_user(&data).is_err());
    }

    #[test]
    fn accepts_valid_signature() {
        let data = signed(&[
            ("auth_date", "1700000000"),
            ("query_id", "AAE"),
            ("user", r#"{"id":42,"first_name":"Olena"}"#),
        ]);
        verify(&data, TOKEN).unwrap();
    }

    #[test]
    fn rejects_tampered_field() {
        let data = signed(&[("auth_date", "1700000000"), ("user", r#"{"id":42}"#)]);
        let tampered = data.replace("42", "43");
        assert!(matches!(
            verify(&tampered, TOKEN),
            Err(InitDataError::BadSignature)
        ));
    }

    #[test]
    fn rejects_other_bot_token() {
        let data = signed(&[("user", r#"{"id":42}"#)]);
        assert!(verify(&data, "999:OTHER").is_err());
    }

    #[test]
    fn rejects_missing_hash() {
        let data = encode(&[("user", r#"{"id":42}"#)]);
        assert!(matches!(verify(&data, TOKEN), Err(InitDataError::MissingHash)));
    }
}
