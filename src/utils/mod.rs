pub mod time;

pub use time::{trailing_window, DATE_FMT};
