//! Storage-scan token extraction.
//!
//! The fallback strategy when no `Authorization` header was observed:
//! every stored string value is tested against a small heuristic, local
//! storage entirely before session storage, first hit wins.

use tr_types::{CapturedToken, StorageDump, TokenSource};

/// JSON fields checked, in priority order, when a stored value parses as an
/// object.
const TOKEN_FIELDS: &[&str] = &["access_token", "id_token", "token"];

/// Apply the token heuristic to one stored value.
///
/// A value that itself starts with `"eyJ"` (the base64url encoding of a
/// JSON type header) is taken verbatim, without JSON parsing. Otherwise the
/// value is parsed as JSON and the first present of `access_token`,
/// `id_token`, `token` wins. Anything else is not a token.
pub fn extract_token(value: &str) -> Option<String> {
    if value.starts_with("eyJ") {
        return Some(value.to_string());
    }

    let parsed: serde_json::Value = serde_json::from_str(value).ok()?;
    for field in TOKEN_FIELDS {
        if let Some(token) = parsed.get(field).and_then(|v| v.as_str()) {
            return Some(token.to_string());
        }
    }
    None
}

/// Scan a storage dump for a token.
///
/// Local storage is scanned entirely before session storage; within each
/// area, keys are visited in their natural enumeration order and the first
/// key yielding a token stops the scan.
pub fn scan_storage(dump: &StorageDump) -> Option<CapturedToken> {
    for (_, value) in &dump.local {
        if let Some(token) = extract_token(value) {
            return Some(CapturedToken::new(token, TokenSource::LocalStorage));
        }
    }
    for (_, value) in &dump.session {
        if let Some(token) = extract_token(value) {
            return Some(CapturedToken::new(token, TokenSource::SessionStorage));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(
        local: &[(&str, &str)],
        session: &[(&str, &str)],
    ) -> StorageDump {
        StorageDump {
            local: local
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            session: session
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn raw_jwt_is_returned_verbatim() {
        // A value with the eyJ prefix skips JSON parsing entirely, even
        // though it is not valid JSON.
        let token = extract_token("eyJhbGciOiJSUzI1NiJ9.payload.sig").unwrap();
        assert_eq!(token, "eyJhbGciOiJSUzI1NiJ9.payload.sig");
    }

    #[test]
    fn json_access_token_field_is_extracted() {
        let token = extract_token(r#"{"access_token":"xyz123","expires_in":3600}"#).unwrap();
        assert_eq!(token, "xyz123");
    }

    #[test]
    fn json_field_priority_order() {
        // access_token beats id_token beats token.
        let value = r#"{"token":"c","id_token":"b","access_token":"a"}"#;
        assert_eq!(extract_token(value).as_deref(), Some("a"));

        let value = r#"{"token":"c","id_token":"b"}"#;
        assert_eq!(extract_token(value).as_deref(), Some("b"));

        let value = r#"{"token":"c"}"#;
        assert_eq!(extract_token(value).as_deref(), Some("c"));
    }

    #[test]
    fn plain_string_is_not_a_token() {
        assert_eq!(extract_token("remember-me=true"), None);
        assert_eq!(extract_token(""), None);
        // Valid JSON without a recognized field.
        assert_eq!(extract_token(r#"{"theme":"dark"}"#), None);
        // Non-string token fields don't count.
        assert_eq!(extract_token(r#"{"access_token":42}"#), None);
    }

    #[test]
    fn local_storage_is_scanned_before_session_storage() {
        let dump = dump(
            &[("auth", r#"{"access_token":"from-local"}"#)],
            &[("auth", r#"{"access_token":"from-session"}"#)],
        );
        let captured = scan_storage(&dump).unwrap();
        assert_eq!(captured.value, "from-local");
        assert_eq!(captured.source, TokenSource::LocalStorage);
    }

    #[test]
    fn first_matching_key_wins_and_scanning_stops() {
        let dump = dump(
            &[
                ("settings", r#"{"theme":"dark"}"#),
                ("first", "eyJfirst"),
                ("second", "eyJsecond"),
            ],
            &[],
        );
        assert_eq!(scan_storage(&dump).unwrap().value, "eyJfirst");
    }

    #[test]
    fn session_storage_is_the_fallback_area() {
        let dump = dump(
            &[("settings", r#"{"theme":"dark"}"#)],
            &[("sess", r#"{"id_token":"sess-tok"}"#)],
        );
        let captured = scan_storage(&dump).unwrap();
        assert_eq!(captured.value, "sess-tok");
        assert_eq!(captured.source, TokenSource::SessionStorage);
    }

    #[test]
    fn empty_dump_yields_nothing() {
        assert!(scan_storage(&StorageDump::default()).is_none());
    }
}
