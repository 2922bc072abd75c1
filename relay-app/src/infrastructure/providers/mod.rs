mod registry;
mod traits;

pub use registry::ProviderRegistry;
pub use traits::CompletionProvider;
