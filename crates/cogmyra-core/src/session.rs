//! Session identifiers for labelling new conversations.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use sha2::{Digest, Sha256};

/// Length of every generated session id.
pub const SESSION_ID_LEN: usize = 16;

/// Digest bytes kept; 12 bytes encode to exactly 16 base64 characters.
const DIGEST_PREFIX_LEN: usize = SESSION_ID_LEN / 4 * 3;

/// Derive a session id for `user_id` from the current wall-clock second.
///
/// The id is URL and filesystem safe (`[A-Za-z0-9_-]`), changes from one
/// second to the next and differs between users within the same second.
pub fn make_session_id(user_id: &str) -> String {
    make_session_id_at(user_id, Utc::now().timestamp())
}

/// Derive a session id for `user_id` at an explicit UNIX time in seconds.
pub fn make_session_id_at(user_id: &str, unix_seconds: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b":");
    hasher.update(unix_seconds.to_string().as_bytes());
    let digest = hasher.finalize();
    URL_SAFE_NO_PAD.encode(&digest[..DIGEST_PREFIX_LEN])
}
