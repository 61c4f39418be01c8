//! Data model for search requests and the records they produce

mod record;
mod request;
mod resource_type;

pub use record::{LanguageStats, RepositoryExtra, ResourceRecord};
pub use request::SearchRequest;
pub use resource_type::ResourceType;
