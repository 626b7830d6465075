pub mod cache;
pub mod config;
pub mod connect;
pub mod error;
pub mod inventory;
pub mod record;
pub mod selector;
pub mod users;

pub use error::{JumpError, Result};
pub use record::InstanceRecord;
