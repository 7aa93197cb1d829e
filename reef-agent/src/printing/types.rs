//! Print job and order types
//!
//! The order payload keeps the field names of the POS frontend's JSON.

use serde::Deserialize;

/// One order line
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub quantidade: u32,
    pub nome: String,
    #[serde(default)]
    pub observacoes: Option<String>,
}

/// An order ticket as submitted by the POS frontend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Order {
    /// Table number or label
    #[serde(default)]
    pub mesa: Option<String>,
    /// Counter number or label, rendered only when no table is set
    #[serde(default)]
    pub balcao: Option<String>,
    #[serde(default)]
    pub numero: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    /// Waiter name
    #[serde(default)]
    pub garcom: Option<String>,
    #[serde(default)]
    pub itens: Vec<OrderItem>,
    /// Trailing note for the whole order
    #[serde(default)]
    pub observacoes: Option<String>,
}

/// What produced a print payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Test,
    Raw,
    Order,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Test => "test",
            JobKind::Raw => "raw",
            JobKind::Order => "order",
        }
    }
}

/// An ephemeral dispatch request: target printer plus formatted payload
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub printer_id: String,
    pub data: Vec<u8>,
    pub kind: JobKind,
}

impl PrintJob {
    pub fn new(printer_id: impl Into<String>, data: Vec<u8>, kind: JobKind) -> Self {
        Self {
            printer_id: printer_id.into(),
            data,
            kind,
        }
    }
}
