//! Search lifecycle as seen by the presentation layer.

mod session;
mod state;

pub use session::SearchSession;
pub use state::SearchState;
