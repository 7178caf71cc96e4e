// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Challenge interception and bypass
//!
//! The dispatcher sits in an [`InterceptorChain`] in front of the HTTP
//! client. Requests to hosts with cached clearance are rebuilt with the
//! recovered session state; first requests to a challenged host trigger a
//! solve through the browser engine; hosts that cannot be solved degrade to
//! an unmodified passthrough.

mod cache;
mod chain;
mod config;
mod dispatcher;
mod rebuild;
mod single_flight;
mod solver;

pub use cache::{ClearanceCache, ClearanceEntry};
pub use chain::{Chain, Interceptor, InterceptorChain};
pub use config::BypassConfig;
pub use dispatcher::ChallengeInterceptor;
pub use rebuild::{RequestRebuilder, ResolvedIdentity};
pub use solver::ChallengeSolver;
