//! jackc-sem - Whole-program deferred resolution.
//!
//! After every translation unit has been parsed, the resolver runs exactly
//! once over the accumulated [`Program`](jackc_par::program::Program):
//!
//! 1. substitute subroutine (and field/static) names in the flat typing
//!    records with their declared types;
//! 2. patch `do`-call discards: a call whose callee turned out non-void
//!    loses its trailing `pop temp 0`, keeping the return value on the
//!    stack;
//! 3. fold every typing record left-to-right, checking operand
//!    compatibility;
//! 4. validate return expressions and array indices;
//! 5. resolve type names and calls against the program scope;
//! 6. report: unknown types, subroutines, and constructors are fatal;
//!    arity/type mismatches and incompatible assignments or returns are
//!    warnings.

pub mod compat;
mod resolver;

pub use compat::compatible;
pub use resolver::resolve;
