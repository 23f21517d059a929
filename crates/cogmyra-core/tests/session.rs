//! Wall-clock behaviour of session ids.

use cogmyra_core::{SESSION_ID_LEN, make_session_id};
use std::time::Duration;

/// Ids generated more than a second apart differ for the same user.
#[test]
fn make_session_id_changes_over_time() {
    let first = make_session_id("sameuser");
    std::thread::sleep(Duration::from_millis(1100));
    let second = make_session_id("sameuser");
    assert_ne!(first, second);
}

/// Ids stay short and URL safe.
#[test]
fn make_session_id_format_and_length() {
    let sid = make_session_id("user123");
    assert!(!sid.is_empty());
    assert!(sid.len() <= SESSION_ID_LEN);
    assert!(
        sid.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    );
}
