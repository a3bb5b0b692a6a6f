//! Join code generation for lobbies.
//!
//! Codes are 6-character strings drawn from an unambiguous alphabet (no 0/O,
//! no 1/I) so they survive being read aloud or typed from a phone screen.
//! Uniqueness among active lobbies is enforced at allocation time, not here.

use rand::prelude::*;

const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const CODE_LEN: usize = 6;

/// Generate a candidate lobby join code.
pub fn generate_join_code() -> String {
    let mut rng = rand::rng();

    let mut s = String::with_capacity(CODE_LEN);
    for _ in 0..CODE_LEN {
        let idx = rng.random_range(0..ALPHABET.len());
        s.push(ALPHABET[idx] as char);
    }
    s
}

/// Whether a client-supplied string is shaped like a join code. Used to
/// decide between code lookup and id lookup on join, and to reject junk
/// before touching the database.
pub fn is_valid_code(candidate: &str) -> bool {
    candidate.len() == CODE_LEN && candidate.bytes().all(|b| ALPHABET.contains(&b))
}
