pub mod cancel;
pub mod debounce;

pub use cancel::{CancelHandle, RequestCanceller};
pub use debounce::Debouncer;
