pub mod debouncer;
pub mod state;

pub use debouncer::{CaptionDebouncer, DEBOUNCE_WINDOW};
pub use state::CaptionState;
