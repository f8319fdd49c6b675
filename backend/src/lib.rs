//! Registry library modules: user and admin registration over a
//! transactional store, exposed through a JSON API and HTML pages.

pub mod domain;
pub mod inbound;
pub mod logging;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
