//! Fast and Safe Tracking: plan with a simple model, track with a fast
//! one, and stay inside a precomputed tracking error bound.
//!
//! The heart of the crate is [`graph::dynamic_planner::GraphDynamicPlanner`],
//! a sampling-based planner whose every accepted node carries a witnessed
//! escape route, so a plan stays feasible under repeated replanning. The
//! tracking side consumes the precomputed value function through
//! [`value::ValueFunction`].

pub mod clock;
pub mod cost;
pub mod graph;
pub mod instrumentation;
pub mod params;
pub mod planner;
pub mod space;
pub mod states;
pub mod stats;
pub mod subplanner;
pub mod trajectory;
pub mod value;
