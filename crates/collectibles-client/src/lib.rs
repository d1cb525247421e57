pub mod assemble;
pub mod cancel;
pub mod client;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod retry;
pub mod wire;

pub use assemble::assemble_catalog;
pub use cancel::{CancelHandle, CancelToken};
pub use client::{ClientOptions, CommerceClient, LOCALE_HEADER};
pub use error::{FetchError, FetchErrorKind};
pub use loader::CategorySource;
pub use normalize::normalize_categories;
pub use retry::{RecordingSleeper, RetryPolicy, Sleeper, TokioSleeper};
pub use wire::CategoriesResponse;
