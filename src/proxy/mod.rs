//! Conversion between Lambda proxy events and standard `http` types.
//!
//! [`RequestAccessor`] builds an `http::Request` out of an event and reads
//! back the platform metadata carried in custom headers; [`ResponseRecorder`]
//! captures what a handler writes and turns it into the platform response.

pub mod request;
pub mod response;

pub use request::{
    ALB_CONTEXT_HEADER, API_GW_CONTEXT_HEADER, API_GW_STAGE_VARS_HEADER, CUSTOM_HOST_VARIABLE,
    DEFAULT_SERVER_ADDRESS, RequestAccessor, decode_body, query_string,
};
pub use response::{ResponseRecorder, gateway_timeout, target_group_timeout};
