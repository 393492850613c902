pub mod error;
pub mod event;

pub use aws_lambda_events::encodings::Body;
pub use aws_lambda_events::event::alb::{
    AlbTargetGroupRequest, AlbTargetGroupRequestContext, AlbTargetGroupResponse, ElbContext,
};
pub use aws_lambda_events::event::apigw::{
    ApiGatewayProxyRequest, ApiGatewayProxyRequestContext, ApiGatewayProxyResponse,
    ApiGatewayRequestIdentity,
};
pub use aws_lambda_events::query_map::QueryMap;
pub use error::{HandleError, ProxyError};
pub use event::{ProxyEvent, ProxyResponse};
