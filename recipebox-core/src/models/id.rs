//! Recipe identifiers.
//!
//! Ids minted on this device before the remote store has confirmed a
//! recipe carry the [`LOCAL_ID_PREFIX`], so a cached collection still
//! tells temporary ids apart from server-assigned ones after a restart.

use rand::Rng;

/// Prefix of every client-minted id.
pub const LOCAL_ID_PREFIX: &str = "local-";

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 8;

/// Which id space an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Minted locally, not yet known to the remote store.
    Local,
    /// Assigned by the remote store.
    Confirmed,
}

impl IdKind {
    pub fn of(id: &str) -> Self {
        if id.starts_with(LOCAL_ID_PREFIX) {
            IdKind::Local
        } else {
            IdKind::Confirmed
        }
    }
}

/// Mints a temporary id that does not collide with any of `existing`.
pub fn mint_local_id<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let mut rng = rand::rng();
    loop {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        let id = format!("{}{}", LOCAL_ID_PREFIX, suffix);
        if !existing.clone().into_iter().any(|other| other == id) {
            return id;
        }
    }
}
