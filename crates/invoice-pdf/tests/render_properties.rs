//! Property tests for invoice rendering
//!
//! Layout-level checks see the original Unicode text; byte-level checks read
//! the finished PDF back with lopdf, where `₹` is written as `Rs.`.

use invoice_pdf::{
    extract_text_runs, is_usable, link_targets, render_invoice, render_invoice_or_empty,
    InvoiceRenderer, InvoiceStyle, RenderError, RowKind,
};
use legal_types::{CaseReference, Expense, Invoice, InvoiceRequest, PartyInfo, TimeEntry};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn scenario() -> InvoiceRequest {
    InvoiceRequest {
        invoice: Invoice::new(1250.0)
            .with_number("INV-2025-031")
            .with_dates("2025-05-23", "2025-06-22"),
        expenses: vec![Expense::new(
            "Client meeting transportation",
            Some("2025-05-20"),
            45.0,
        )],
        time_entries: vec![TimeEntry::new("Research", Some("2025-05-22"), 1.5, 250.0)],
        issuer: Some(PartyInfo::named("Adv. Kavita Rao")),
        client: Some(PartyInfo::named("Rajesh Kumar")),
        case_ref: Some(CaseReference::new(
            "CS/1042/2025",
            "Kumar v. Horizon Builders",
        )),
    }
}

fn all_runs(bytes: &[u8]) -> Vec<String> {
    extract_text_runs(bytes).unwrap().into_iter().flatten().collect()
}

// ============================================================
// Concrete scenario
// ============================================================

#[test]
fn scenario_layout_rows_and_total() {
    let layout = InvoiceRenderer::default().layout(&scenario()).unwrap();

    assert_eq!(layout.rows.len(), 2);
    assert_eq!(layout.rows[0].amount, "₹45.00");
    assert_eq!(layout.rows[1].amount, "₹375.00");
    assert_eq!(layout.total_text, "Total: ₹1250.00");
    assert_eq!(layout.page_count(), 1);
}

#[test]
fn scenario_pdf_text() {
    let bytes = InvoiceRenderer::default().render(&scenario()).unwrap();
    let runs = all_runs(&bytes);

    for expected in [
        "Client meeting transportation",
        "20/05/2025",
        "Expense",
        "Rs.45.00",
        "Research",
        "22/05/2025",
        "Time Entry",
        "1.50",
        "Rs.250.00",
        "Rs.375.00",
        "Total: Rs.1250.00",
        "Invoice #: INV-2025-031",
        "Issue Date: 23/05/2025",
        "Due Date: 22/06/2025",
        "Adv. Kavita Rao",
        "Rajesh Kumar",
        "Case No: CS/1042/2025",
        "Case Title: Kumar v. Horizon Builders",
        "Page 1 of 1",
    ] {
        assert!(
            runs.iter().any(|r| r == expected),
            "missing {:?} in {:?}",
            expected,
            runs
        );
    }
}

#[test]
fn custom_currency_symbol_is_used_everywhere() {
    let mut style = InvoiceStyle::default();
    style.set_currency_symbol("$");
    let layout = InvoiceRenderer::new(style).layout(&scenario()).unwrap();
    assert_eq!(layout.rows[1].rate, "$250.00");
    assert_eq!(layout.total_text, "Total: $1250.00");
}

// ============================================================
// Empty and failing input
// ============================================================

#[test]
fn zero_line_items_still_render() {
    let request = InvoiceRequest::new(Invoice::new(0.0));
    let layout = InvoiceRenderer::default().layout(&request).unwrap();
    assert!(layout.rows.is_empty());
    assert!(layout.contains_text("Description"));
    assert!(layout.contains_text("Lawyer Name"));
    assert!(layout.contains_text("Client Name"));
    assert!(layout.contains_text("Invoice #: N/A"));

    let bytes = InvoiceRenderer::default().render(&request).unwrap();
    assert!(is_usable(&bytes));
}

#[test]
fn negative_amount_fails_typed_and_empties_legacy() {
    let invoice = Invoice::new(-100.0);
    let style = InvoiceStyle::default();

    let typed = render_invoice(&invoice, &[], &[], None, None, None, &style);
    assert!(matches!(typed, Err(RenderError::InvalidAmount(_))));

    let legacy = render_invoice_or_empty(&invoice, &[], &[], None, None, None, &style);
    assert!(legacy.is_empty());
}

// ============================================================
// Pagination
// ============================================================

#[test]
fn long_invoice_paginates_with_footers_and_repeated_header() {
    let mut request = InvoiceRequest::new(Invoice::new(5000.0));
    request.time_entries = (0..120)
        .map(|i| TimeEntry::new(format!("Drafting session {}", i), Some("2025-04-01"), 1.0, 50.0))
        .collect();

    let renderer = InvoiceRenderer::default();
    let layout = renderer.layout(&request).unwrap();
    let pages = layout.page_count();
    assert!(pages > 1);

    for page in &layout.pages {
        let label = format!("Page {} of {}", page.number, pages);
        assert!(page.contains_text(&label), "page {} lacks {:?}", page.number, label);
        if page.texts().any(|t| t.starts_with("Drafting session")) {
            assert!(page.contains_text("Description"));
            assert!(page.contains_text("Amount"));
        }
    }
    assert_eq!(layout.count_text("Drafting session 0"), 1);
    assert_eq!(layout.count_text("Drafting session 119"), 1);

    let bytes = renderer.render(&request).unwrap();
    let pdf_pages = extract_text_runs(&bytes).unwrap();
    assert_eq!(pdf_pages.len(), pages);
    let last = format!("Page {} of {}", pages, pages);
    assert!(pdf_pages[pages - 1].iter().any(|r| *r == last));
}

// ============================================================
// Payment link
// ============================================================

#[test]
fn payment_link_produces_one_uri_annotation() {
    let mut request = scenario();
    request.invoice.payment_link = Some("https://pay.example.com/inv/2025-031".into());
    let bytes = InvoiceRenderer::default().render(&request).unwrap();
    assert_eq!(
        link_targets(&bytes).unwrap(),
        vec!["https://pay.example.com/inv/2025-031".to_string()]
    );
    assert!(all_runs(&bytes)
        .iter()
        .any(|r| r == "Pay online: https://pay.example.com/inv/2025-031"));
}

#[test]
fn long_payment_link_wraps_into_one_annotation() {
    let url = format!(
        "https://payments.example.com/checkout/session/{}?invoice=INV-2025-031",
        "x9y8z7w6".repeat(12)
    );
    assert!(url.len() > 150);
    let mut request = scenario();
    request.invoice.payment_link = Some(url.clone());
    let bytes = InvoiceRenderer::default().render(&request).unwrap();

    assert_eq!(link_targets(&bytes).unwrap(), vec![url.clone()]);
    let runs = all_runs(&bytes);
    let start = runs.iter().position(|r| r.starts_with("Pay online")).unwrap();
    let end = runs.iter().position(|r| r == "Thank you for your business.").unwrap();
    assert!(end - start > 1, "link text should wrap");
    let printed: String = runs[start..end].concat();
    assert_eq!(printed, format!("Pay online:{}", url));
}

// ============================================================
// Rupee sign under the standard-14 fonts
// ============================================================

#[test]
fn rupee_sign_is_written_as_rs_in_pdf_bytes() {
    let request = scenario();
    let layout = InvoiceRenderer::default().layout(&request).unwrap();
    assert_eq!(layout.total_text, "Total: ₹1250.00");

    let bytes = InvoiceRenderer::default().render(&request).unwrap();
    let runs = all_runs(&bytes);
    assert!(runs.iter().any(|r| r == "Total: Rs.1250.00"));
    for amount in ["Rs.45.00", "Rs.250.00", "Rs.375.00"] {
        assert_eq!(runs.iter().filter(|r| *r == amount).count(), 1, "{amount}");
    }
    // No lossy substitution anywhere in the money cells
    assert!(!runs.iter().any(|r| r.contains('?') || r.contains('₹')), "{runs:?}");
}

#[test]
fn blank_payment_link_renders_nothing() {
    let mut request = scenario();
    request.invoice.payment_link = Some("   ".into());
    let bytes = InvoiceRenderer::default().render(&request).unwrap();
    assert!(link_targets(&bytes).unwrap().is_empty());
    assert!(!all_runs(&bytes).iter().any(|r| r.starts_with("Pay online")));
}

// ============================================================
// Properties
// ============================================================

fn short_description() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn total_is_stated_amount(
        amount in 0.0f64..10_000_000.0,
        expense_amounts in prop::collection::vec(0.0f64..5_000.0, 0..5),
    ) {
        let mut request = InvoiceRequest::new(Invoice::new(amount));
        request.expenses = expense_amounts
            .iter()
            .map(|a| Expense::new("Disbursement", None, *a))
            .collect();
        let layout = InvoiceRenderer::default().layout(&request).unwrap();
        prop_assert_eq!(layout.total_text, format!("Total: ₹{:.2}", amount));
    }

    #[test]
    fn every_expense_gets_one_placeholder_row(
        descriptions in prop::collection::vec(short_description(), 0..20),
    ) {
        let mut request = InvoiceRequest::new(Invoice::new(1.0));
        request.expenses = descriptions
            .iter()
            .map(|d| Expense::new(d.clone(), Some("2025-01-15"), 10.0))
            .collect();
        let layout = InvoiceRenderer::default().layout(&request).unwrap();

        let expense_rows: Vec<_> = layout
            .rows
            .iter()
            .filter(|r| r.kind == RowKind::Expense)
            .collect();
        prop_assert_eq!(expense_rows.len(), descriptions.len());
        for (row, description) in expense_rows.iter().zip(&descriptions) {
            prop_assert_eq!(&row.description, description);
            prop_assert_eq!(row.hours.as_str(), "-");
            prop_assert_eq!(row.rate.as_str(), "-");
        }
    }

    #[test]
    fn time_entry_amount_is_hours_times_rate(
        hours in 0.0f64..200.0,
        rate in 0.0f64..50_000.0,
    ) {
        let mut request = InvoiceRequest::new(Invoice::new(0.0));
        request.time_entries = vec![TimeEntry::new("Consultation", None, hours, rate)];
        let layout = InvoiceRenderer::default().layout(&request).unwrap();
        prop_assert_eq!(&layout.rows[0].amount, &format!("₹{:.2}", hours * rate));
    }

    #[test]
    fn expenses_always_precede_time_entries(
        expenses in prop::collection::vec(short_description(), 0..6),
        entries in prop::collection::vec(short_description(), 0..6),
    ) {
        let mut request = InvoiceRequest::new(Invoice::new(1.0));
        request.time_entries = entries
            .iter()
            .map(|d| TimeEntry::new(d.clone(), None, 1.0, 1.0))
            .collect();
        request.expenses = expenses
            .iter()
            .map(|d| Expense::new(d.clone(), None, 1.0))
            .collect();
        let layout = InvoiceRenderer::default().layout(&request).unwrap();

        let kinds: Vec<RowKind> = layout.rows.iter().map(|r| r.kind).collect();
        let mut expected = vec![RowKind::Expense; expenses.len()];
        expected.extend(vec![RowKind::TimeEntry; entries.len()]);
        prop_assert_eq!(kinds, expected);

        let descriptions: Vec<&String> = layout.rows.iter().map(|r| &r.description).collect();
        let input: Vec<&String> = expenses.iter().chain(entries.iter()).collect();
        prop_assert_eq!(descriptions, input);
    }

    #[test]
    fn malformed_dates_render_invalid_date(garbage in "[a-z]{1,10}") {
        let mut request = InvoiceRequest::new(Invoice::new(1.0));
        request.expenses = vec![
            Expense::new("Dated", Some(garbage.as_str()), 1.0),
            Expense::new("Undated", None, 1.0),
        ];
        let layout = InvoiceRenderer::default().layout(&request).unwrap();
        prop_assert_eq!(layout.rows[0].date.as_str(), "Invalid Date");
        prop_assert_eq!(layout.rows[1].date.as_str(), "N/A");
    }
}
