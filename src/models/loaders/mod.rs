pub mod links_loader;

pub use links_loader::{load_links, save_links};
