mod list_models;
mod relay_completion;
mod relay_message;

pub use list_models::ListModels;
pub use relay_completion::RelayCompletion;
pub use relay_message::RelayMessage;
