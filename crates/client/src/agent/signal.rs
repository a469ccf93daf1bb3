//! Lifecycle signal dispatch.
//!
//! The host delivers `install`, `activate` and `fetch` signals; each one maps
//! to a handler whose pending operation the host awaits before the signal
//! counts as settled.

use std::fmt;
use std::str::FromStr;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use scribe_core::Error;

use super::{ActivateReport, CacheAgent, FetchOutcome, InstallReport};
use crate::fetch::Request;

/// Fixed signal names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Install,
    Activate,
    Fetch,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Install => "install",
            SignalKind::Activate => "activate",
            SignalKind::Fetch => "fetch",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "install" => Ok(SignalKind::Install),
            "activate" => Ok(SignalKind::Activate),
            "fetch" => Ok(SignalKind::Fetch),
            other => Err(Error::InvalidInput(format!("unknown lifecycle signal: {other}"))),
        }
    }
}

/// A platform-dispatched signal.
#[derive(Debug)]
pub enum LifecycleSignal {
    Install,
    Activate,
    Fetch(Request),
}

impl LifecycleSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            LifecycleSignal::Install => SignalKind::Install,
            LifecycleSignal::Activate => SignalKind::Activate,
            LifecycleSignal::Fetch(_) => SignalKind::Fetch,
        }
    }
}

/// What a settled signal produced.
#[derive(Debug)]
pub enum SignalOutcome {
    Installed(InstallReport),
    Activated(ActivateReport),
    Fetched(FetchOutcome),
}

/// Operation holding a signal open until it resolves.
pub type Pending<'a> = BoxFuture<'a, SignalOutcome>;

impl CacheAgent {
    /// Route a signal to its handler.
    pub fn dispatch(&self, signal: LifecycleSignal) -> Pending<'_> {
        tracing::debug!(signal = %signal.kind(), generation = %self.generation, "dispatching lifecycle signal");
        match signal {
            LifecycleSignal::Install => self.install().map(SignalOutcome::Installed).boxed(),
            LifecycleSignal::Activate => self.activate().map(SignalOutcome::Activated).boxed(),
            LifecycleSignal::Fetch(request) => self.handle_fetch(request).map(SignalOutcome::Fetched).boxed(),
        }
    }
}
