pub mod js_executor;
pub mod render_context;
pub mod render_surface;

pub use js_executor::JsExecutor;
pub use render_context::{ChromeContext, ChromeContextProvider, ContextProvider, RenderContext};
pub use render_surface::{NavigationOptions, RenderSurface};
