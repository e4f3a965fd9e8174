pub mod config_service;
pub mod dto;
pub mod http_remote_store;
pub mod paths;
pub mod stream;

pub use config_service::ConfigService;
pub use http_remote_store::HttpRemoteStore;
pub use paths::ChatsyncPaths;
