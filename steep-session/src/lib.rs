//! Simulated storefront users for steep
//!
//! A [`Storefront`] knows the journeys a user takes through the shop:
//! login, shopping, navigation and an anonymous home page hit. The same
//! journeys run under the goose load harness ([`run_swarm`]) or as a
//! single recorded dry run ([`run_probe`]).

pub mod browser;
pub mod context;
pub mod error;
pub mod flows;
pub mod harness;
pub mod probe;

#[cfg(test)]
mod testing;

pub use browser::{Browser, Page};
pub use context::SessionContext;
pub use error::{BrowserError, FailureKind, SessionError, StepFailure};
pub use flows::{StepResult, Storefront};
pub use harness::{build_scenario, harness_args, reset_database, run_swarm, EndpointTally, GooseBrowser, SwarmReport};
pub use probe::{probe_with, run_probe, ProbeBrowser, ProbeReport, StepOutcome, StepRecord};
