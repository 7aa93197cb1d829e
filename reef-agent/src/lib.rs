//! Reef Print Agent - local print bridge for POS frontends
//!
//! # Architecture
//!
//! ```text
//! reef-agent/src/
//! ├── server/       # config, shared state, HTTP lifecycle
//! ├── routes/       # HTTP API (status, printers, print endpoints)
//! ├── discovery/    # printer registry + local/network sources
//! ├── printing/     # ticket renderer + dispatch engine
//! └── utils/        # errors, logging
//! ```
//!
//! Data flow: renderer → byte payload → dispatcher → (registry lookup) →
//! transport adapter (reef-printer) → device.

pub mod discovery;
pub mod printing;
pub mod routes;
pub mod server;
pub mod utils;

// Re-export public types
pub use discovery::{PrinterRegistry, types::Printer};
pub use printing::{DispatchError, Dispatcher, Order, TicketRenderer};
pub use server::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

/// Load environment and initialize logging
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
   ___  ____________
  / _ \/ __/ __/ __/
 / , _/ _// _// _/
/_/|_/___/___/_/      Print Agent v{}
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
