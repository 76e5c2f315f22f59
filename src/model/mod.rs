pub mod collection;
pub mod config;
pub mod record;

pub use collection::*;
pub use config::*;
pub use record::*;
