//! OAuth 1.0a user-context request signing (HMAC-SHA1).
//!
//! Posting on behalf of a user requires the four credential strings the
//! caller supplies per request: consumer key/secret plus access token and
//! token secret. The signature base string follows RFC 5849; JSON request
//! bodies are not part of the signature (only form-encoded bodies would be).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

use super::client::TwitterCredentials;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters pass through; everything else is escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn oauth_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Build the `Authorization: OAuth ...` header value for one request.
///
/// Nonce and timestamp are freshly generated; use
/// [`authorization_header_at`] for deterministic output in tests.
pub fn authorization_header(creds: &TwitterCredentials, method: &str, url: &str) -> String {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    authorization_header_at(creds, method, url, &nonce, timestamp)
}

/// Deterministic variant of [`authorization_header`] with caller-supplied
/// nonce and timestamp.
pub fn authorization_header_at(
    creds: &TwitterCredentials,
    method: &str,
    url: &str,
    nonce: &str,
    timestamp: u64,
) -> String {
    let timestamp = timestamp.to_string();
    let mut params: Vec<(&str, &str)> = vec![
        ("oauth_consumer_key", &creds.consumer_key),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", &timestamp),
        ("oauth_token", &creds.access_token),
        ("oauth_version", "1.0"),
    ];

    let signature = sign(creds, method, url, &params);
    params.push(("oauth_signature", &signature));
    params.sort_by(|a, b| a.0.cmp(b.0));

    let fields = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, oauth_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {}", fields)
}

/// HMAC-SHA1 over the signature base string, base64-encoded.
fn sign(creds: &TwitterCredentials, method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (oauth_encode(k), oauth_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        oauth_encode(url),
        oauth_encode(&param_string)
    );

    let signing_key = format!(
        "{}&{}",
        oauth_encode(&creds.consumer_secret),
        oauth_encode(&creds.access_token_secret)
    );

    // HMAC accepts keys of any length, so new_from_slice cannot fail here.
    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));
    mac.update(base_string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}
