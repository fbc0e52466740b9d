//! Session state machine and route gating.
//!
//! `SessionContext` tracks who is signed in, driven exclusively by
//! sequence-stamped auth-state reports, so out-of-order completions can never
//! regress the state. `RouteGate` decides whether a protected route renders,
//! waits, or redirects to sign-in.

mod context;
mod gate;

pub use context::{SessionContext, SessionState};
pub use gate::{GateDecision, RouteGate, decide_at};
