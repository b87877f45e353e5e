//! Page layout
//!
//! Positions every piece of the invoice on fixed-size pages. Coordinates are
//! in points measured from the top-left corner of the page; text `y` is the
//! baseline. The writer flips them into PDF space.
//!
//! Sections are placed top to bottom:
//! 1. Title and invoice meta (number, issue date, due date)
//! 2. Issuer and client blocks side by side
//! 3. Case details, when any are present
//! 4. Line-item table; the header row repeats on continuation pages
//! 5. Total, payment link, closing note
//!
//! Footers (`Page X of N`) are stamped once the page count is known.

use legal_types::{billing, CaseReference, Expense, Invoice, InvoiceRequest, PartyInfo, TimeEntry};
use serde::Serialize;

use crate::error::RenderError;
use crate::format;
use crate::metrics::{text_width, wrap_text, Font};
use crate::style::{InvoiceStyle, Rgb};
use crate::table::{self, TableRow, COLUMNS, COLUMN_WEIGHTS, NUMERIC_COLUMNS};

pub const ISSUER_FALLBACK: &str = "Lawyer Name";
pub const CLIENT_FALLBACK: &str = "Client Name";
pub const TOTAL_LABEL: &str = "Total: ";
pub const PAY_ONLINE_LABEL: &str = "Pay online: ";

/// Inner padding of table cells
const CELL_PADDING: f32 = 4.0;

/// Gap between the two party columns
const COLUMN_GAP: f32 = 20.0;

pub fn page_label(page: usize, total: usize) -> String {
    format!("Page {} of {}", page, total)
}

/// Borrowed view of everything one invoice renders from
#[derive(Debug, Clone, Copy)]
pub struct InvoiceInput<'a> {
    pub invoice: &'a Invoice,
    pub expenses: &'a [Expense],
    pub time_entries: &'a [TimeEntry],
    pub issuer: Option<&'a PartyInfo>,
    pub client: Option<&'a PartyInfo>,
    pub case_ref: Option<&'a CaseReference>,
}

impl<'a> From<&'a InvoiceRequest> for InvoiceInput<'a> {
    fn from(request: &'a InvoiceRequest) -> Self {
        Self {
            invoice: &request.invoice,
            expenses: &request.expenses,
            time_entries: &request.time_entries,
            issuer: request.issuer.as_ref(),
            client: request.client.as_ref(),
            case_ref: request.case_ref.as_ref(),
        }
    }
}

impl InvoiceInput<'_> {
    pub fn line_item_total(&self) -> f64 {
        billing::line_item_total(self.expenses, self.time_entries)
    }

    pub fn line_item_count(&self) -> usize {
        billing::line_item_count(self.expenses, self.time_entries)
    }
}

/// Axis-aligned box; `y` is the top edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        size: f32,
        color: Rgb,
    },
    Rule {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    Fill {
        rect: Rect,
        color: Rgb,
    },
    Link {
        rect: Rect,
        uri: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    /// 1-based
    pub number: usize,
    pub elements: Vec<Element>,
}

impl PageLayout {
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.elements.iter().filter_map(|element| match element {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text == needle)
    }

    pub fn links(&self) -> impl Iterator<Item = &str> + '_ {
        self.elements.iter().filter_map(|element| match element {
            Element::Link { uri, .. } => Some(uri.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<PageLayout>,
    /// Table rows in render order
    pub rows: Vec<TableRow>,
    pub total_text: String,
    pub document_title: String,
    pub author: Option<String>,
}

impl InvoiceLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.pages.iter().flat_map(|page| page.texts())
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages.iter().any(|page| page.contains_text(needle))
    }

    pub fn count_text(&self, needle: &str) -> usize {
        self.texts().filter(|text| *text == needle).count()
    }
}

/// Lay out an invoice.
///
/// The printed total is `invoice.amount` as given; line items are not summed.
pub fn compose(input: &InvoiceInput<'_>, style: &InvoiceStyle) -> Result<InvoiceLayout, RenderError> {
    let rows = table::build_rows(input.expenses, input.time_entries, style.currency_symbol())?;
    let total_text = format!(
        "{}{}",
        TOTAL_LABEL,
        format::money(input.invoice.amount, style.currency_symbol())
    );

    let mut composer = Composer::new(style);
    composer.header(input.invoice);
    composer.parties(input.issuer, input.client);
    if let Some(case_ref) = input.case_ref {
        composer.case_block(case_ref);
    }
    composer.table(&rows);
    composer.totals(&total_text);
    if let Some(link) = input
        .invoice
        .payment_link
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        composer.payment_link(link);
    }
    if let Some(note) = style.footer_note() {
        composer.closing_note(note);
    }

    let (page_width, page_height) = style.page_size().dimensions();
    let pages = composer.finish();
    if pages.is_empty() {
        return Err(RenderError::Layout("no pages were produced".to_string()));
    }

    Ok(InvoiceLayout {
        page_width,
        page_height,
        pages,
        rows,
        total_text,
        document_title: format!(
            "Invoice {}",
            format::or_not_available(input.invoice.invoice_number.as_deref())
        ),
        author: input
            .issuer
            .and_then(PartyInfo::display_name)
            .map(str::to_string),
    })
}

/// Cursor over a growing list of pages
struct Composer<'s> {
    style: &'s InvoiceStyle,
    width: f32,
    height: f32,
    margin: f32,
    size: f32,
    line: f32,
    pages: Vec<Vec<Element>>,
    y: f32,
    /// Current table header sits at the top of a page with no rows under it yet
    table_fresh: bool,
}

impl<'s> Composer<'s> {
    fn new(style: &'s InvoiceStyle) -> Self {
        let (width, height) = style.page_size().dimensions();
        Self {
            style,
            width,
            height,
            margin: style.margin(),
            size: style.base_font_size(),
            line: style.line_height(),
            pages: vec![Vec::new()],
            y: style.margin(),
            table_fresh: false,
        }
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn right_edge(&self) -> f32 {
        self.width - self.margin
    }

    /// Lowest y content may reach before the footer area
    fn bottom(&self) -> f32 {
        self.height - self.margin - 2.0 * self.line
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = self.margin;
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y + needed > self.bottom() {
            self.new_page();
        }
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.push(element);
        }
    }

    fn text_at(&mut self, x: f32, y: f32, text: impl Into<String>, font: Font, size: f32, color: Rgb) {
        self.push(Element::Text {
            x,
            y,
            text: text.into(),
            font,
            size,
            color,
        });
    }

    fn text_right(&mut self, right: f32, y: f32, text: impl Into<String>, font: Font, size: f32, color: Rgb) {
        let text = text.into();
        let x = right - text_width(&text, font, size);
        self.text_at(x, y, text, font, size, color);
    }

    fn rule(&mut self, y: f32, width: f32, color: Rgb) {
        self.push(Element::Rule {
            x1: self.margin,
            y1: y,
            x2: self.right_edge(),
            y2: y,
            width,
            color,
        });
    }

    fn header(&mut self, invoice: &Invoice) {
        let accent = self.style.accent_color();
        let title_size = self.style.title_font_size();
        let title_baseline = self.y + title_size;
        self.text_at(
            self.margin,
            title_baseline,
            self.style.title().to_string(),
            Font::Bold,
            title_size,
            accent,
        );

        let meta = [
            format!(
                "Invoice #: {}",
                format::or_not_available(invoice.invoice_number.as_deref())
            ),
            format!(
                "Issue Date: {}",
                format::display_date(invoice.issue_date.as_deref())
            ),
            format!(
                "Due Date: {}",
                format::display_date(invoice.due_date.as_deref())
            ),
        ];
        let mut baseline = self.y + self.size;
        let mut last_baseline = baseline;
        for line in meta {
            self.text_right(self.right_edge(), baseline, line, Font::Regular, self.size, Rgb::BLACK);
            last_baseline = baseline;
            baseline += self.line;
        }

        self.y = title_baseline.max(last_baseline) + self.line * 0.8;
        self.rule(self.y, 1.0, accent);
        self.y += self.line;
    }

    fn party_lines(&self, party: Option<&PartyInfo>, fallback: &str, width: f32) -> Vec<(String, Font)> {
        let name = party.and_then(PartyInfo::display_name).unwrap_or(fallback);
        let mut lines: Vec<(String, Font)> = wrap_text(name, Font::Bold, self.size, width)
            .into_iter()
            .map(|line| (line, Font::Bold))
            .collect();
        for contact in party.map(PartyInfo::contact_lines).unwrap_or_default() {
            for wrapped in wrap_text(&contact, Font::Regular, self.size, width) {
                lines.push((wrapped, Font::Regular));
            }
        }
        lines
    }

    fn party_column(&mut self, x: f32, top: f32, heading: &str, lines: &[(String, Font)]) {
        let mut baseline = top + self.size;
        self.text_at(x, baseline, heading, Font::Bold, self.size, self.style.accent_color());
        for (text, font) in lines {
            baseline += self.line;
            self.text_at(x, baseline, text.clone(), *font, self.size, Rgb::BLACK);
        }
    }

    fn parties(&mut self, issuer: Option<&PartyInfo>, client: Option<&PartyInfo>) {
        let column_width = (self.content_width() - COLUMN_GAP) / 2.0;
        let left = self.party_lines(issuer, ISSUER_FALLBACK, column_width);
        let right = self.party_lines(client, CLIENT_FALLBACK, column_width);
        let line_count = 1 + left.len().max(right.len());

        self.ensure_space(line_count as f32 * self.line);
        let top = self.y;
        self.party_column(self.margin, top, "From:", &left);
        self.party_column(
            self.margin + column_width + COLUMN_GAP,
            top,
            "Bill To:",
            &right,
        );
        self.y = top + line_count as f32 * self.line + self.line * 0.5;
    }

    fn case_block(&mut self, case_ref: &CaseReference) {
        let lines: Vec<String> = case_ref
            .lines()
            .iter()
            .flat_map(|line| wrap_text(line, Font::Regular, self.size, self.content_width()))
            .collect();
        if lines.is_empty() {
            return;
        }

        self.ensure_space((lines.len() + 1) as f32 * self.line);
        let mut baseline = self.y + self.size;
        self.text_at(
            self.margin,
            baseline,
            "Case Details",
            Font::Bold,
            self.size,
            self.style.accent_color(),
        );
        for line in lines {
            baseline += self.line;
            self.text_at(self.margin, baseline, line, Font::Regular, self.size, Rgb::BLACK);
        }
        self.y = baseline + self.line;
    }

    /// Left edge and width of each table column
    fn columns(&self) -> [(f32, f32); 6] {
        let mut columns = [(0.0, 0.0); 6];
        let mut x = self.margin;
        for (column, weight) in columns.iter_mut().zip(COLUMN_WEIGHTS) {
            let width = self.content_width() * weight;
            *column = (x, width);
            x += width;
        }
        columns
    }

    fn cell(&mut self, column: usize, baseline: f32, text: &str, font: Font, color: Rgb) {
        let (x, width) = self.columns()[column];
        if NUMERIC_COLUMNS[column] {
            self.text_right(x + width - CELL_PADDING, baseline, text, font, self.size, color);
        } else {
            self.text_at(x + CELL_PADDING, baseline, text, font, self.size, color);
        }
    }

    fn table_header(&mut self) {
        self.table_fresh = self.y == self.margin;
        let height = self.line + 2.0 * CELL_PADDING;
        self.push(Element::Fill {
            rect: Rect {
                x: self.margin,
                y: self.y,
                width: self.content_width(),
                height,
            },
            color: self.style.accent_color(),
        });
        let baseline = self.y + CELL_PADDING + self.size;
        for (column, heading) in COLUMNS.iter().enumerate() {
            self.cell(column, baseline, heading, Font::Bold, Rgb::WHITE);
        }
        self.y += height;
    }

    /// Draw one row (or one page's share of a very tall row)
    fn table_row(&mut self, row: &TableRow, description: &[String], first_chunk: bool) {
        let top = self.y;
        let height = description.len() as f32 * self.line + 2.0 * CELL_PADDING;
        let baseline = top + CELL_PADDING + self.size;

        let (x, _) = self.columns()[0];
        for (i, line) in description.iter().enumerate() {
            self.text_at(
                x + CELL_PADDING,
                baseline + i as f32 * self.line,
                line.clone(),
                Font::Regular,
                self.size,
                Rgb::BLACK,
            );
        }
        if first_chunk {
            for (column, text) in row.cells().iter().enumerate().skip(1) {
                self.cell(column, baseline, text, Font::Regular, Rgb::BLACK);
            }
        }

        self.rule(top + height, 0.5, Rgb::LIGHT_GRAY);
        self.y = top + height;
        self.table_fresh = false;
    }

    fn table(&mut self, rows: &[TableRow]) {
        let header_height = self.line + 2.0 * CELL_PADDING;
        // Header plus at least one single-line row
        self.ensure_space(2.0 * header_height);
        self.table_header();

        let description_width = self.columns()[0].1 - 2.0 * CELL_PADDING;
        for row in rows {
            let lines = wrap_text(&row.description, Font::Regular, self.size, description_width);
            let mut remaining: &[String] = &lines;
            let mut first_chunk = true;

            loop {
                let available = self.bottom() - self.y - 2.0 * CELL_PADDING;
                let fits = if available > 0.0 {
                    (available / self.line).floor() as usize
                } else {
                    0
                };

                // Move a row that does not fit to the next page, unless it
                // would not fit on an empty page either
                if fits < remaining.len() && !self.table_fresh {
                    self.new_page();
                    self.table_header();
                    continue;
                }

                let take = fits.min(remaining.len()).max(1);
                let (chunk, rest) = remaining.split_at(take);
                self.table_row(row, chunk, first_chunk);
                remaining = rest;
                first_chunk = false;

                if remaining.is_empty() {
                    break;
                }
                self.new_page();
                self.table_header();
            }
        }
    }

    fn totals(&mut self, total_text: &str) {
        let size = self.size + 2.0;
        self.ensure_space(self.line * 2.0);
        self.y += self.line * 0.5;
        let baseline = self.y + size;
        self.text_right(self.right_edge(), baseline, total_text, Font::Bold, size, Rgb::BLACK);
        self.y = baseline + self.line;
    }

    fn payment_link(&mut self, url: &str) {
        let color = self.style.link_color();
        let text = format!("{}{}", PAY_ONLINE_LABEL, url);
        let lines = wrap_text(&text, Font::Regular, self.size, self.content_width());

        self.ensure_space(lines.len() as f32 * self.line);
        let top = self.y;
        let mut widest: f32 = 0.0;
        for line in lines {
            let baseline = self.y + self.size;
            let width = text_width(&line, Font::Regular, self.size);
            widest = widest.max(width);
            self.text_at(self.margin, baseline, line, Font::Regular, self.size, color);
            self.push(Element::Rule {
                x1: self.margin,
                y1: baseline + 1.5,
                x2: self.margin + width,
                y2: baseline + 1.5,
                width: 0.5,
                color,
            });
            self.y += self.line;
        }
        // Single annotation spanning every wrapped line
        self.push(Element::Link {
            rect: Rect {
                x: self.margin,
                y: top,
                width: widest,
                height: self.y - top,
            },
            uri: url.to_string(),
        });
    }

    fn closing_note(&mut self, note: &str) {
        let lines = wrap_text(note, Font::Regular, self.size, self.content_width());
        self.ensure_space((lines.len() as f32 + 0.5) * self.line);
        self.y += self.line * 0.5;
        for line in lines {
            let baseline = self.y + self.size;
            self.text_at(self.margin, baseline, line, Font::Regular, self.size, Rgb::GRAY);
            self.y += self.line;
        }
    }

    /// Stamp every page with its footer
    fn finish(mut self) -> Vec<PageLayout> {
        let total = self.pages.len();
        let rule_y = self.bottom() + self.line * 0.5;
        let baseline = rule_y + self.line;
        let label_size = self.size - 1.0;
        let (x1, x2, width) = (self.margin, self.right_edge(), self.width);

        std::mem::take(&mut self.pages)
            .into_iter()
            .enumerate()
            .map(|(i, mut elements)| {
                let label = page_label(i + 1, total);
                let label_x = (width - text_width(&label, Font::Regular, label_size)) / 2.0;
                elements.push(Element::Rule {
                    x1,
                    y1: rule_y,
                    x2,
                    y2: rule_y,
                    width: 0.5,
                    color: Rgb::LIGHT_GRAY,
                });
                elements.push(Element::Text {
                    x: label_x,
                    y: baseline,
                    text: label,
                    font: Font::Regular,
                    size: label_size,
                    color: Rgb::GRAY,
                });
                PageLayout {
                    number: i + 1,
                    elements,
                }
            })
            .collect()
    }
}
