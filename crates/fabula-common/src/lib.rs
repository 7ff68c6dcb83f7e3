//! Shared primitives used by every stage of the Fabula compiler:
//! source positions ([`Locus`]) and positioned diagnostics.

mod diagnostic;
mod locus;

pub use diagnostic::{Diagnostic, Severity};
pub use locus::{Cursor, Locus};
