pub mod analyzer;
pub mod pipeline;
pub mod session;
