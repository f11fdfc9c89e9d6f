mod queries;
mod requests;
mod responses;

pub use queries::{DirectQuery, LogsParams, ServiceQuery};
pub use requests::ServiceRequest;
pub use responses::{GatewayEnvelope, ServiceResponse};
