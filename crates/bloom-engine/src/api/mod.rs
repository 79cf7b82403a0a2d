pub mod sketch;
pub mod types;
