pub mod config;
pub mod collection;
pub mod content;
pub mod logger;
pub mod navigation;
pub mod report;
mod test_data;

pub use content::{ContentItem, RawRecord};
pub use content::error::{ValidationError, Violation};
pub use content::schema::{validate, validate_value};
