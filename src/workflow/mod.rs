pub mod detail_flow;
pub mod link_ctx;

pub use detail_flow::DetailFlow;
pub use link_ctx::LinkCtx;
