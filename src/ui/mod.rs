pub mod bars;
pub mod follow;

pub use bars::{load_band, progress_band, render_bar, BAR_WIDTH};
pub use follow::run_follow;
