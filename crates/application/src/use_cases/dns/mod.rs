pub mod error_response;
pub mod forward_query;

pub use error_response::ErrorResponder;
pub use forward_query::ForwardQueryUseCase;
