use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

/// Builds the `Authorization` header value for HTTP Basic authentication.
pub fn basic_authorization(user: &str, token: &str) -> String {
    let encoded = BASE64_STANDARD.encode(format!("{}:{}", user, token));
    format!("Basic {}", encoded)
}
