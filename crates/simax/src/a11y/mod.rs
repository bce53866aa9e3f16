/*!
Accessibility vocabulary: roles, attributes, actions, and values.
*/

mod action;
mod attribute;
mod role;
mod value;

pub use action::{Action, Direction};
pub use attribute::Attribute;
pub use role::Role;
pub use value::Value;
