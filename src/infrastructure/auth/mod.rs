pub mod password;
pub mod request_id;

pub use password::SharedSecret;
pub use request_id::{request_id_middleware, RequestId};
