pub mod garden;
pub mod scene;
pub mod time;
