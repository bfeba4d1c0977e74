//! Discord REST plumbing: routes, rate limits and the HTTP session.

mod path;
mod ratelimit;
mod session;

pub use path::{ApiPath, API_VERSION, DEFAULT_API_BASE};
pub use ratelimit::{seconds_to_duration, BucketGuard, RateLimitHeaders, RateLimiter};
pub use session::HttpSession;
