mod relay_error;

pub use relay_error::{ErrorBody, RelayError, ERROR_CODE_SENTINEL};
