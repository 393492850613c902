//! Runs existing HTTP handlers behind API Gateway proxy integrations and
//! load balancer target groups on AWS Lambda.
//!
//! A [`ProxyAdapter`] converts each invocation event into an `http::Request`,
//! hands it to a [`Handler`] and converts what the handler wrote into the
//! response the platform expects.

pub mod adapter;
pub mod config;
pub mod handler;
pub mod models;
pub mod proxy;
pub mod utils;

pub use adapter::{Handler, ProxyAdapter};
pub use config::Config;
pub use models::{HandleError, ProxyError, ProxyEvent, ProxyResponse};
pub use proxy::{RequestAccessor, ResponseRecorder};
