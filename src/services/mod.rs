pub mod notifier;
pub mod seed;
pub mod state;
pub mod store;
pub mod upload;
