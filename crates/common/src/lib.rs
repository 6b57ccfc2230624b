pub mod proto {
    tonic::include_proto!("thrippy.v1");
}

pub mod activity_error;
pub mod link_id;

pub use activity_error::{ActivityError, Retry};
