//! CLI command implementations

pub mod completions;
pub mod config;
pub mod render;
pub mod status;
pub mod warmup;

pub use completions::execute as completions;
pub use config::execute as config;
pub use render::execute as render;
pub use status::execute as status;
pub use warmup::execute as warmup;
