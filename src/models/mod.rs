pub mod business;
pub mod link;
pub mod loaders;

pub use business::{BusinessFields, BusinessRecord, FailureRecord, ScrapeOutcome, UNAVAILABLE};
pub use link::{Link, LinkSet};
pub use loaders::{load_links, save_links};
