//! jackc-util - Foundation types shared by every compiler phase.
//!
//! This crate provides the two things every other crate needs:
//!
//! - [`Symbol`]: interned strings for identifiers, type names, and class
//!   names, so comparison is an integer compare and the handles are `Copy`.
//! - [`Diagnostic`] / [`Handler`]: error and warning values that render the
//!   compiler's diagnostic format, and the handler that reports warnings.

pub mod diagnostic;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use symbol::Symbol;
