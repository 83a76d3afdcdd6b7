#[cfg(feature = "aws")]
pub mod ecr;
pub mod fixed;

#[cfg(feature = "aws")]
pub use ecr::EcrRegistryClient;
pub use fixed::FixedRegistry;
