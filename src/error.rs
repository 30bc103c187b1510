/*!
Error types for the stream adapter.
*/
use crate::backend::BackendError;
use thiserror::Error;

/// Errors surfaced by the stream adapter.
///
/// The adapter neither catches nor retries anything: a malformed time
/// string fails at configuration time, and every other failure is the
/// backend's own error passed through. End-of-stream is `Ok(None)`, never
/// an error.
#[derive(Debug, Error)]
pub enum BgpStreamError {
    #[error("cannot parse time string {input:?}: {reason}")]
    InvalidTimeString { input: String, reason: String },
    #[error(transparent)]
    Backend(#[from] BackendError),
}
