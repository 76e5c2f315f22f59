pub mod list;
pub mod record_parser;
pub mod record_serializer;

pub use list::{parse_list, serialize_list};
pub use record_parser::{extract_fields, parse_record};
pub use record_serializer::{display_record, serialize_record};
