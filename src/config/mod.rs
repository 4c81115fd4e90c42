//! Configuration module

mod site;

pub use site::Environment;
pub use site::FirestoreConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
