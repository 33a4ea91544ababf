// Commissioner passphrase gate.
// A local convenience lock over the admin transforms, not authentication: the hash is a
// 32-bit string hash that anyone holding the snapshot can brute force.

use tracing::info;

use crate::error::GateError;
use crate::league::League;

/// 32-bit rolling hash (h * 31 + c over UTF-16 code units) as a decimal string.
/// None for empty input.
pub fn hash_lite(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    let h = s
        .encode_utf16()
        .fold(0i32, |h, c| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32));
    Some(h.to_string())
}

pub fn is_unlocked(league: &League) -> bool {
    league.ui.commish_unlocked
}

pub fn has_password(league: &League) -> bool {
    league.settings.commissioner.password_hash.is_some()
}

/// First-time setup. Leaves the league unlocked.
pub fn set_password(league: &League, password: &str, confirm: &str) -> Result<League, GateError> {
    if has_password(league) {
        return Err(GateError::AlreadySet);
    }
    if password.is_empty() {
        return Err(GateError::EmptyPassword);
    }
    if password != confirm {
        return Err(GateError::Mismatch);
    }
    let mut next = league.clone();
    next.settings.commissioner.password_hash = hash_lite(password);
    next.ui.commish_unlocked = true;
    info!("commissioner password set");
    Ok(next)
}

pub fn unlock(league: &League, password: &str) -> Result<League, GateError> {
    let stored = league.settings.commissioner.password_hash.as_deref();
    if stored.is_none() || hash_lite(password).as_deref() != stored {
        return Err(GateError::IncorrectPassword);
    }
    let mut next = league.clone();
    next.ui.commish_unlocked = true;
    Ok(next)
}

pub fn lock(league: &League) -> League {
    let mut next = league.clone();
    next.ui.commish_unlocked = false;
    next
}

/// Change the password. Requires the gate to be open and, when a password exists, the old one.
pub fn reset_password(
    league: &League,
    old: &str,
    new: &str,
    confirm: &str,
) -> Result<League, GateError> {
    if !is_unlocked(league) {
        return Err(GateError::Locked);
    }
    if let Some(stored) = league.settings.commissioner.password_hash.as_deref() {
        if hash_lite(old).as_deref() != Some(stored) {
            return Err(GateError::IncorrectPassword);
        }
    }
    if new.is_empty() {
        return Err(GateError::EmptyPassword);
    }
    if new != confirm {
        return Err(GateError::Mismatch);
    }
    let mut next = league.clone();
    next.settings.commissioner.password_hash = hash_lite(new);
    info!("commissioner password changed");
    Ok(next)
}

/// Gate an admin transform: runs `f` only while unlocked
pub fn guarded<F>(league: &League, f: F) -> Result<League, GateError>
where
    F: FnOnce(&League) -> League,
{
    if is_unlocked(league) {
        Ok(f(league))
    } else {
        Err(GateError::Locked)
    }
}
