pub mod list_ops;
pub mod record_ops;
