pub mod app;
pub mod clipboard;
pub mod input;
pub mod render;
pub mod theme;

pub use app::run;
