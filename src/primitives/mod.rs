//! Binding primitives - small helpers the update engine leans on.
//!
//! - [`is_different`] - change identity with the NaN carve-out
//! - [`flatten`] - order-preserving, non-recursive list flattening
//! - [`stringify`] - diagnostic rendering of binding values
//!
//! All of them work on [`BindingValue`], the dynamic value type bindings and
//! template contexts carry.

mod flatten;
mod identity;
mod stringify;
mod types;

pub use flatten::flatten;
pub use identity::{is_different, ChangeIdentity};
pub use stringify::stringify;
pub use types::*;
