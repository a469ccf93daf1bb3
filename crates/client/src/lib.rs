//! Client code for scribe-sw.
//!
//! This crate provides the request/response model, the network capability
//! with its reqwest implementation, and the cache agent that answers page
//! requests cache-first.

pub mod agent;
pub mod fetch;

pub use agent::{
    ActivateReport, CacheAgent, Disposition, FetchOutcome, InstallReport, LifecycleSignal, ManifestFailure,
    PassReason, Pending, SignalKind, SignalOutcome, disposition,
};

pub use fetch::{FetchClient, FetchConfig, Method, Network, Request, RequestMode, Response, classify, resolve, same_origin};
