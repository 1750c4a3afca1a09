pub mod cookie_consent;
pub mod feed_collector;
pub mod field_extractor;
pub mod result_writer;
pub mod text_normalizer;

pub use cookie_consent::dismiss_cookie_consent;
pub use feed_collector::{CollectReport, FeedCollector};
pub use field_extractor::FieldExtractor;
pub use result_writer::ResultWriter;
