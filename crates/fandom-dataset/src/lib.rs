pub mod api;
pub mod error;
pub mod local;
pub mod sink;

pub use api::ApiDatasetSink;
pub use error::DatasetError;
pub use local::LocalDatasetSink;
pub use sink::RecordSink;
