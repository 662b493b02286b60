pub mod rate_limit_client;
pub mod retry_policy;

pub use rate_limit_client::{FetchResponse, RateLimitClient};
pub use retry_policy::RetryPolicy;
