mod filter_bar;
mod task_row;

pub use filter_bar::FilterBar;
pub use task_row::TaskRow;
