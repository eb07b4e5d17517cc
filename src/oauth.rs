// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! OAuth2 refresh-token exchange.
//!
//! The pipeline holds a long-lived refresh token as configuration and trades
//! it for a short-lived access token at the start of every run. A failed
//! exchange is fatal: nothing downstream may run, and no artifact may be
//! written, without a valid token.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// A ready-to-use `Authorization` header value (`"Bearer <token>"`).
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    fn new(access_token: &str) -> Self {
        Self(format!("Bearer {}", access_token))
    }

    /// The full header value, prefix included.
    pub fn authorization_value(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
    grant_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Exchange the refresh token for a bearer token.
///
/// The endpoint is called with a JSON body carrying the client credentials
/// and `grant_type: "refresh_token"`. Any response that does not contain an
/// `access_token` (an expired refresh token, or an HTML error page) becomes
/// [`Error::Authentication`] with the raw body preserved.
pub async fn refresh_access_token(
    client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<BearerToken> {
    let request = TokenRequest {
        client_id,
        client_secret,
        refresh_token,
        grant_type: "refresh_token",
    };

    let body = client
        .post(token_url)
        .json(&request)
        .send()
        .await?
        .text()
        .await?;

    parse_token_response(&body)
}

fn parse_token_response(body: &str) -> Result<BearerToken> {
    match serde_json::from_str::<TokenResponse>(body) {
        Ok(token) => Ok(BearerToken::new(&token.access_token)),
        Err(_) => Err(Error::Authentication {
            body: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_response_success() {
        let body = r#"{
            "token_type": "Bearer",
            "expires_at": 1756000000,
            "refresh_token": "refresh-xyz",
            "access_token": "access-abc"
        }"#;

        let token = parse_token_response(body).expect("token should parse");
        assert_eq!(token.authorization_value(), "Bearer access-abc");
    }

    #[test]
    fn test_parse_token_response_minimal() {
        let token = parse_token_response(r#"{"access_token": "abc"}"#).expect("should parse");
        assert_eq!(token.authorization_value(), "Bearer abc");
    }

    #[test]
    fn test_missing_access_token_preserves_body() {
        let body = r#"{"message": "Bad Request", "errors": [{"field": "refresh_token"}]}"#;

        match parse_token_response(body) {
            Err(Error::Authentication { body: raw }) => {
                assert!(raw.contains("Bad Request"));
                assert!(raw.contains("refresh_token"));
            }
            other => panic!("expected authentication error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_non_json_body_is_authentication_error() {
        assert!(matches!(
            parse_token_response("<html>maintenance</html>"),
            Err(Error::Authentication { .. })
        ));
        assert!(matches!(
            parse_token_response(""),
            Err(Error::Authentication { .. })
        ));
    }
}
