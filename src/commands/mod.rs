//! The example command set served by the `dispair` binary.

pub mod fun;
pub mod utils;

use crate::router::Router;

/// Router holding every example command.
pub fn router() -> Router {
    let mut router = Router::new();
    fun::register(&mut router);
    utils::register(&mut router);
    router
}
