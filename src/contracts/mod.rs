// Deployed-contract integration: artifact lookup and the ImageStore handle
pub mod artifact;
pub mod service;

pub use service::ImageStoreService;
