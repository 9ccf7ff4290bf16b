//! Application layer: the lookup controller, its panels and the
//! process-wide context.

pub mod context;
pub mod controller;
pub mod panels;

pub use context::AppContext;
pub use controller::{AppController, Dialog, DialogKind, FlagState, LookupPhase, SubmitOutcome};
