use std::fmt::Display;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RotationError<E> {
    #[error("no API keys configured")]
    NoKeys,
    #[error("all {attempts} API key(s) failed; last error: {last}")]
    Exhausted { attempts: usize, last: E },
}

/// Success of a rotated call together with the index of the key that worked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotated<T> {
    pub value: T,
    pub key_index: usize,
}

/// Try `call` with each key in round-robin order starting at `start`.
///
/// Stops at the first success. When every key fails the last error is
/// reported along with the number of attempts.
pub fn with_key_rotation<T, E, F>(
    keys: &[String],
    start: usize,
    call: F,
) -> Result<Rotated<T>, RotationError<E>>
where
    E: Display,
    F: FnMut(&str) -> Result<T, E>,
{
    rotate(keys, start, keys.len(), call)
}

/// Rotation limited to `max_attempts` keys
pub(super) fn rotate<T, E, F>(
    keys: &[String],
    start: usize,
    max_attempts: usize,
    mut call: F,
) -> Result<Rotated<T>, RotationError<E>>
where
    E: Display,
    F: FnMut(&str) -> Result<T, E>,
{
    if keys.is_empty() {
        return Err(RotationError::NoKeys);
    }
    let attempts = max_attempts.clamp(1, keys.len());
    let mut last = None;

    for offset in 0..attempts {
        let key_index = (start + offset) % keys.len();
        match call(&keys[key_index]) {
            Ok(value) => return Ok(Rotated { value, key_index }),
            Err(err) => {
                warn!(
                    key_index,
                    attempt = offset + 1,
                    of = attempts,
                    error = %err,
                    "API key failed"
                );
                last = Some(err);
            }
        }
    }

    match last {
        Some(last) => Err(RotationError::Exhausted { attempts, last }),
        None => Err(RotationError::NoKeys),
    }
}
