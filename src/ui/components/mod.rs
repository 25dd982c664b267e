pub mod chart;
pub mod terminal;
pub mod utils;
