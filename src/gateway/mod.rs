//! Fail-soft access to TMDB.
//!
//! Every gateway call returns a renderable value: transport errors, non-2xx
//! statuses and malformed payloads are logged at error level and turned into
//! an empty list or `None`.

pub mod genres;
pub mod images;
pub mod movies;

use crate::error::AppResult;

fn fail_soft<T>(call: &'static str, result: AppResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(call, error = %err, "TMDB call failed");
            None
        },
    }
}
