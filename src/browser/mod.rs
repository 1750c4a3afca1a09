pub mod connection;
pub mod headless;
pub mod session;

pub use session::BrowserSession;
