//! Decision agents for both sides

pub mod blue;
pub mod red;

pub use blue::DeductionAi;
pub use red::{AssignmentAi, RedPlan};
