pub mod config;
pub mod logging;

pub mod feed;
pub mod pipeline;
pub mod retry;
pub mod staging;
pub mod transport;
pub mod upload;
