pub mod core;
pub mod grades;
pub mod matrix;
pub mod reports;
pub mod stats;
