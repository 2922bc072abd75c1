mod request_validator;

pub use request_validator::RequestValidator;
