mod context;

pub mod ancestors;
pub mod fields;
pub mod files;
pub mod search;
pub mod sync;

pub use context::HandlerContext;
