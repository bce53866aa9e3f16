/*! Core value types shared across the engine.

Regenerate TypeScript types by running the test suite (ts-rs exports on test).
*/

#![allow(missing_docs)]

mod element;
mod error;
mod geometry;
mod ids;
mod outcome;

pub use element::{ElementSummary, UiElement};
pub use error::{SimaxError, SimaxResult};
pub use geometry::{Frame, Point};
pub(crate) use ids::ElementIdCounter;
pub use ids::{ElementId, ProcessId};
pub use outcome::Outcome;
