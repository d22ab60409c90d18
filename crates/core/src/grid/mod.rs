//! Paged thumbnail grid layout.
//!
//! [`plan_tiling`] is a pure function: the same item count, viewport and
//! geometry always produce the same [`TilingPlan`].

mod tiler;
mod types;

pub use tiler::plan_tiling;
pub use types::*;
