mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::EvmClient;
pub use error::{ClientError, ClientResult};
