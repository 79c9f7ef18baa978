//! Anti-forgery tokens bound to the visitor's session.
//!
//! A token is a random nonce followed by SHA-256 over the session secret and
//! that nonce. Every issued token is different, and any of them verifies
//! against the session that issued it.

use bookings_render::TokenIssuer;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::session::Session;

/// Form field carrying the token on submission.
pub const CSRF_FIELD: &str = "csrf_token";

const NONCE_LEN: usize = 32;
const MAC_LEN: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsrfIssuer;

impl CsrfIssuer {
    /// Check a submitted token against the session.
    pub fn verify(&self, session: &Session, token: &str) -> bool {
        if token.len() != NONCE_LEN + MAC_LEN || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
            return false;
        }
        let Some(secret) = session.secret() else {
            return false;
        };

        let (nonce, mac) = token.split_at(NONCE_LEN);
        let Some(mac) = decode_hex(mac) else {
            return false;
        };
        bool::from(digest(&secret, nonce).as_slice().ct_eq(&mac))
    }
}

impl TokenIssuer<Session> for CsrfIssuer {
    fn issue(&self, session: &Session) -> String {
        // Sessions are created by the middleware before any handler runs.
        let secret = session.secret().unwrap_or_default();
        let nonce = Uuid::new_v4().simple().to_string();
        let mac: String = digest(&secret, &nonce)
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        format!("{}{}", nonce, mac)
    }
}

fn digest(secret: &str, nonce: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(nonce.as_bytes());
    hasher.finalize().into()
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}
