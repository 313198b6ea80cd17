pub mod machine;
pub mod policy;
pub mod session;

pub use machine::{LedgerConfig, SignalBar, TradeLedger};
pub use policy::PolicyFileConfig;
pub use session::SessionHours;
