//! Shared record types for the legalpad crates
//!
//! Billing data consumed by the invoice renderer, plus the read-only
//! case/client directory the front-ends inject into their components.

pub mod billing;
pub mod directory;

pub use billing::{
    line_item_count, line_item_total, CaseReference, Expense, Invoice, InvoiceRequest, PartyInfo,
    TimeEntry,
};
pub use directory::{CaseRecord, ClientRecord, Directory, DirectoryError, InMemoryDirectory};
