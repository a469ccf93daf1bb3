//! Which network responses the interceptor may store.

use std::fmt;

use scribe_core::ResponseKind;

use crate::fetch::Response;

/// What to do with a fresh network response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Return to the page and write a copy to the current bucket.
    Store,
    /// Return to the page untouched.
    PassThrough(PassReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    /// Cross-origin without CORS; the body cannot be inspected.
    Opaque,
    /// Cross-origin with CORS.
    CrossOrigin,
    /// Same-origin but reached through a redirect.
    Redirected,
    /// Same-origin with a status other than 200.
    Status(u16),
}

impl fmt::Display for PassReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassReason::Opaque => f.write_str("opaque"),
            PassReason::CrossOrigin => f.write_str("cross-origin"),
            PassReason::Redirected => f.write_str("redirected"),
            PassReason::Status(status) => write!(f, "status {status}"),
        }
    }
}

/// Only direct same-origin responses with status exactly 200 are stored.
pub fn disposition(response: &Response) -> Disposition {
    match response.kind {
        ResponseKind::Opaque => Disposition::PassThrough(PassReason::Opaque),
        ResponseKind::Cors => Disposition::PassThrough(PassReason::CrossOrigin),
        ResponseKind::Basic if response.redirected => Disposition::PassThrough(PassReason::Redirected),
        ResponseKind::Basic if response.status != 200 => Disposition::PassThrough(PassReason::Status(response.status)),
        ResponseKind::Basic => Disposition::Store,
    }
}
