pub mod page_extractor;
pub mod readability;
pub mod sitemap;

pub use page_extractor::{classify_link, LinkCounts, LinkKind, PageExtractor};
pub use readability::estimate_readability;
pub use sitemap::extract_url_from_sitemap;
