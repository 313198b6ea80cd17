pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{Config, TelegramConfig};
pub use error::{Error, Result};
pub use traits::{BarFeed, Clock, Notifier, StateStore, VenueClock};
pub use types::*;
