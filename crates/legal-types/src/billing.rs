//! Billing records consumed by the invoice renderer.
//!
//! Dates are kept as the caller's raw strings. The browser shell stores
//! whatever the date input produced, so interpretation (and the
//! `Invalid Date` / `N/A` fallbacks) happens at format time.

use serde::{Deserialize, Serialize};

/// A billing record with a total amount owed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    /// Stated total, printed as-is
    pub amount: f64,
    /// External payment page, rendered as a clickable link
    #[serde(default)]
    pub payment_link: Option<String>,
}

impl Invoice {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = Some(number.into());
        self
    }

    pub fn with_dates(mut self, issued: impl Into<String>, due: impl Into<String>) -> Self {
        self.issue_date = Some(issued.into());
        self.due_date = Some(due.into());
        self
    }

    pub fn with_payment_link(mut self, url: impl Into<String>) -> Self {
        self.payment_link = Some(url.into());
        self
    }

    /// Amount is finite and non-negative
    pub fn has_valid_amount(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }
}

/// An out-of-pocket cost billed to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
    pub amount: f64,
}

impl Expense {
    pub fn new(description: impl Into<String>, date: Option<&str>, amount: f64) -> Self {
        Self {
            description: description.into(),
            date: date.map(str::to_string),
            amount,
        }
    }
}

/// Billable hours at an hourly rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
    pub hours: f64,
    pub rate: f64,
}

impl TimeEntry {
    pub fn new(description: impl Into<String>, date: Option<&str>, hours: f64, rate: f64) -> Self {
        Self {
            description: description.into(),
            date: date.map(str::to_string),
            hours,
            rate,
        }
    }

    pub fn amount(&self) -> f64 {
        self.hours * self.rate
    }
}

/// Display and contact details for the issuing lawyer or the billed client.
///
/// Every field is optional; blank strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartyInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl PartyInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Name if present and non-blank
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Contact lines in render order (address, email, phone), skipping blanks
    pub fn contact_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(address) = non_blank(self.address.as_deref()) {
            lines.push(address.to_string());
        }
        if let Some(email) = non_blank(self.email.as_deref()) {
            lines.push(format!("Email: {}", email));
        }
        if let Some(phone) = non_blank(self.phone.as_deref()) {
            lines.push(format!("Phone: {}", phone));
        }
        lines
    }
}

/// The matter an invoice is billed against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CaseReference {
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
}

impl CaseReference {
    pub fn new(case_number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            case_number: Some(case_number.into()),
            title: Some(title.into()),
            court: None,
        }
    }

    pub fn with_court(mut self, court: impl Into<String>) -> Self {
        self.court = Some(court.into());
        self
    }

    /// Printed case details in order (number, title, court), skipping blanks

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(number) = non_blank(self.case_number.as_deref()) {
            lines.push(format!("Case No: {}", number));
        }
        if let Some(title) = non_blank(self.title.as_deref()) {
            lines.push(format!("Case Title: {}", title));
        }
        if let Some(court) = non_blank(self.court.as_deref()) {
            lines.push(format!("Court: {}", court));
        }
        lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

/// Everything needed to render one invoice, as a single JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub invoice: Invoice,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
    #[serde(default)]
    pub issuer: Option<PartyInfo>,
    #[serde(default)]
    pub client: Option<PartyInfo>,
    #[serde(default)]
    pub case_ref: Option<CaseReference>,
}

impl InvoiceRequest {
    pub fn new(invoice: Invoice) -> Self {
        Self {
            invoice,
            ..Self::default()
        }
    }

    /// Sum of every line item. Not necessarily equal to `invoice.amount`.
    pub fn line_item_total(&self) -> f64 {
        line_item_total(&self.expenses, &self.time_entries)
    }

    pub fn line_item_count(&self) -> usize {
        line_item_count(&self.expenses, &self.time_entries)
    }
}

/// Expense amounts plus time-entry amounts
pub fn line_item_total(expenses: &[Expense], time_entries: &[TimeEntry]) -> f64 {
    let expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    let time: f64 = time_entries.iter().map(TimeEntry::amount).sum();
    expenses + time
}

pub fn line_item_count(expenses: &[Expense], time_entries: &[TimeEntry]) -> usize {
    expenses.len() + time_entries.len()
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
