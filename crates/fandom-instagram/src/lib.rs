pub mod client;
pub mod error;
pub mod normalize;
pub mod platform;
pub mod types;

pub use client::InstagramClient;
pub use error::InstagramError;
pub use normalize::{normalize_follower, normalize_user};
pub use platform::PlatformClient;
