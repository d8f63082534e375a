//! Reusable utils for services that handle common behavior, such as
//! initializing the tracing framework and signalling shutdown.

pub mod logging;
pub mod shutdown;
