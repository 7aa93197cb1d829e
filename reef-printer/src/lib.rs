//! # reef-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Network printing (TCP port 9100)
//! - Spooler printing (OS print queue submission)
//!
//! Business logic (WHAT to print) stays in the agent:
//! - Ticket rendering and printer discovery → reef-agent
//!
//! ## Example
//!
//! ```ignore
//! use reef_printer::{EscPosBuilder, NetworkPrinter, Printer};
//!
//! // Build ESC/POS content
//! let mut builder = EscPosBuilder::new(32);
//! builder.center();
//! builder.size_large();
//! builder.line("MESA 12");
//! builder.size_normal();
//! builder.sep_double();
//! builder.left();
//! builder.line("2x Coffee");
//! builder.cut();
//!
//! // Send to network printer
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print(&builder.build()).await?;
//! ```

mod error;
mod escpos;
mod printer;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::{NetworkPrinter, Printer, RAW_PORT, SerialPrinter, SpoolerPrinter};
