use crate::request::TransportResponse;
use dialog_core::types::Outcome;

/// Turns a transport outcome into a typed outcome.
///
/// A failed transport short-circuits without touching the body. Parse errors
/// are logged under `operation` and collapse to `None`; they never reach the
/// caller as errors.
pub fn decode<T, P>(operation: &str, response: &TransportResponse, parse: P) -> Outcome<T>
where
    P: FnOnce(&[u8]) -> anyhow::Result<T>,
{
    if !response.success {
        log::debug!("{operation}: transport reported failure");
        return None;
    }

    match parse(&response.data) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("{operation} decode failed: {e:#}");
            None
        }
    }
}
