//! # Criterion Builder
//!
//! Filter predicates as an explicit expression tree (`MatchAll`, `Cmp`,
//! `Between`, `In`, `And`, `Or`, `Not`) with a pure renderer producing a
//! parameterized statement fragment.

mod expr;
mod render;

pub use expr::{CmpOp, Criterion, Field, FieldSelector};
pub use render::Rendered;
