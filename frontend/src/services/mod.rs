pub mod api;
pub mod dates;
pub mod logging;
pub mod session;
