//! Paginated PDF invoices for legal billing
//!
//! Rendering runs in two phases:
//! - [`layout::compose`] places every piece of the invoice on fixed-size pages
//! - [`writer::write_pdf`] serializes that layout with lopdf
//!
//! [`render_invoice`] returns a typed error. [`render_invoice_or_empty`] keeps
//! the older contract of returning an empty byte vector on failure, for hosts
//! that test the artifact instead of handling errors.

pub mod artifact;
pub mod error;
pub mod format;
pub mod layout;
pub mod metrics;
pub mod style;
pub mod table;
pub mod writer;

pub use artifact::{extract_text_runs, is_usable, link_targets, ArtifactInfo};
pub use error::{ArtifactError, RenderError, StyleError};
pub use layout::{compose, InvoiceInput, InvoiceLayout, PageLayout};
pub use style::{InvoiceStyle, PageSize, Rgb};
pub use table::{RowKind, TableRow};
pub use writer::write_pdf;

use legal_types::{CaseReference, Expense, Invoice, InvoiceRequest, PartyInfo, TimeEntry};

/// Line items may legitimately differ from the stated amount by rounding
const RECONCILE_TOLERANCE: f64 = 0.005;

/// Renders invoices with one fixed style
#[derive(Debug, Clone, Default)]
pub struct InvoiceRenderer {
    style: InvoiceStyle,
}

impl InvoiceRenderer {
    pub fn new(style: InvoiceStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &InvoiceStyle {
        &self.style
    }

    /// Validate the input and lay it out without writing any bytes
    pub fn layout(&self, request: &InvoiceRequest) -> Result<InvoiceLayout, RenderError> {
        self.compose_input(&InvoiceInput::from(request))
    }

    pub fn render(&self, request: &InvoiceRequest) -> Result<Vec<u8>, RenderError> {
        self.render_input(&InvoiceInput::from(request))
    }

    /// Like [`render`](Self::render), but failures become an empty vector
    pub fn render_or_empty(&self, request: &InvoiceRequest) -> Vec<u8> {
        swallow(self.render(request))
    }

    fn compose_input(&self, input: &InvoiceInput<'_>) -> Result<InvoiceLayout, RenderError> {
        self.style.validate()?;
        if !input.invoice.has_valid_amount() {
            return Err(RenderError::InvalidAmount(input.invoice.amount));
        }

        let line_items = input.line_item_count();
        if line_items > 0 {
            let line_total = input.line_item_total();
            if (line_total - input.invoice.amount).abs() > RECONCILE_TOLERANCE {
                tracing::warn!(
                    stated = input.invoice.amount,
                    line_total,
                    "Line items do not add up to the invoice amount"
                );
            }
        }

        let layout = layout::compose(input, &self.style)?;
        tracing::debug!(
            rows = layout.rows.len(),
            pages = layout.page_count(),
            "Invoice laid out"
        );
        Ok(layout)
    }

    fn render_input(&self, input: &InvoiceInput<'_>) -> Result<Vec<u8>, RenderError> {
        let span = tracing::debug_span!(
            "render_invoice",
            number = input.invoice.invoice_number.as_deref().unwrap_or_default()
        );
        let _guard = span.enter();

        let layout = self.compose_input(input)?;
        let bytes = writer::write_pdf(&layout)?;
        tracing::debug!(bytes = bytes.len(), "Invoice written");
        Ok(bytes)
    }
}

fn swallow(result: Result<Vec<u8>, RenderError>) -> Vec<u8> {
    match result {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Invoice rendering failed; returning empty artifact");
            Vec::new()
        }
    }
}

/// Render one invoice to PDF bytes.
///
/// The printed total is `invoice.amount`; line items are listed but never
/// summed into it. Missing optional data falls back to placeholder text.
pub fn render_invoice(
    invoice: &Invoice,
    expenses: &[Expense],
    time_entries: &[TimeEntry],
    issuer: Option<&PartyInfo>,
    client: Option<&PartyInfo>,
    case_ref: Option<&CaseReference>,
    style: &InvoiceStyle,
) -> Result<Vec<u8>, RenderError> {
    let input = InvoiceInput {
        invoice,
        expenses,
        time_entries,
        issuer,
        client,
        case_ref,
    };
    InvoiceRenderer::new(style.clone()).render_input(&input)
}

/// [`render_invoice`] that logs failures and returns an empty vector instead
pub fn render_invoice_or_empty(
    invoice: &Invoice,
    expenses: &[Expense],
    time_entries: &[TimeEntry],
    issuer: Option<&PartyInfo>,
    client: Option<&PartyInfo>,
    case_ref: Option<&CaseReference>,
    style: &InvoiceStyle,
) -> Vec<u8> {
    swallow(render_invoice(
        invoice,
        expenses,
        time_entries,
        issuer,
        client,
        case_ref,
        style,
    ))
}
