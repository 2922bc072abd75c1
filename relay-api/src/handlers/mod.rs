pub mod completions;
pub mod message;
