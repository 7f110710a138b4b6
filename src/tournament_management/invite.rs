//! Invite code generation for join-by-link

use rand::distributions::Alphanumeric;
use rand::Rng;

pub const INVITE_CODE_LEN: usize = 10;

/// Opaque random token; uniqueness is enforced by the store
pub fn generate_invite_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(INVITE_CODE_LEN)
        .map(char::from)
        .collect()
}

/// Whether `code` has the shape of a generated code
pub fn looks_like_invite_code(code: &str) -> bool {
    code.len() == INVITE_CODE_LEN && code.chars().all(|c| c.is_ascii_alphanumeric())
}
