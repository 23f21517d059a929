//! Small helpers shared by CogMyra front ends: session ids and greetings.

mod greet;
pub mod session;

pub use greet::greet;
pub use session::{SESSION_ID_LEN, make_session_id, make_session_id_at};
