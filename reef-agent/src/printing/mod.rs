//! Print pipeline: rendering and dispatch
//!
//! The renderer turns structured tickets into ESC/POS payloads; the
//! dispatcher routes payloads to the right transport adapter.

pub mod dispatcher;
pub mod renderer;
pub mod types;

pub use dispatcher::{DispatchError, DispatchResult, Dispatcher};
pub use renderer::TicketRenderer;
pub use types::{JobKind, Order, OrderItem, PrintJob};
