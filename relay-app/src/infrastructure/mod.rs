pub mod openai;
pub mod providers;
pub mod validation;
