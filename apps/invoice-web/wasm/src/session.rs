//! Stateful invoice builder
//!
//! Holds the invoice being edited in Rust so the page script only forwards
//! form events. Case and client details come from an injected directory.

use invoice_pdf::{InvoiceRenderer, InvoiceStyle, PageSize};
use legal_types::{Directory, Expense, InMemoryDirectory, Invoice, InvoiceRequest, PartyInfo, TimeEntry};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {}: {}", what, e))
}

#[wasm_bindgen]
pub struct InvoiceSession {
    request: InvoiceRequest,
    style: InvoiceStyle,
    directory: InMemoryDirectory,
    selected_case: Option<String>,
}

impl Default for InvoiceSession {
    fn default() -> Self {
        Self::with_directory(InMemoryDirectory::sample())
    }
}

impl InvoiceSession {
    pub fn with_directory(directory: InMemoryDirectory) -> Self {
        Self {
            request: InvoiceRequest::default(),
            style: InvoiceStyle::default(),
            directory,
            selected_case: None,
        }
    }

    pub fn request(&self) -> &InvoiceRequest {
        &self.request
    }

    pub fn style(&self) -> &InvoiceStyle {
        &self.style
    }

    fn set_invoice_internal(&mut self, json: &str) -> Result<(), String> {
        let invoice: Invoice = parse("invoice", json)?;
        if !invoice.amount.is_finite() {
            return Err("Invoice amount must be a number".to_string());
        }
        self.request.invoice = invoice;
        Ok(())
    }

    fn add_expense_internal(&mut self, json: &str) -> Result<usize, String> {
        let expense: Expense = parse("expense", json)?;
        self.request.expenses.push(expense);
        Ok(self.request.line_item_count())
    }

    fn add_time_entry_internal(&mut self, json: &str) -> Result<usize, String> {
        let entry: TimeEntry = parse("time entry", json)?;
        self.request.time_entries.push(entry);
        Ok(self.request.line_item_count())
    }

    fn set_party_internal(&mut self, json: &str, client: bool) -> Result<(), String> {
        let party: Option<PartyInfo> = if json.trim().is_empty() {
            None
        } else {
            parse("party", json)?
        };
        if client {
            self.request.client = party;
        } else {
            self.request.issuer = party;
        }
        Ok(())
    }

    /// Fill the case reference, and the client when the case names one
    fn select_case_internal(&mut self, case_id: &str) -> Result<(), String> {
        let case = self
            .directory
            .case(case_id)
            .ok_or_else(|| format!("Unknown case: {}", case_id))?;
        self.request.case_ref = Some(case.to_reference());
        if let Some(client) = self.directory.client_for_case(case_id) {
            self.request.client = Some(client.to_party());
        }
        self.selected_case = Some(case_id.to_string());
        Ok(())
    }

    fn set_page_size_internal(&mut self, size: &str) -> Result<(), String> {
        let size: PageSize = size.parse().map_err(|e: invoice_pdf::StyleError| e.to_string())?;
        self.style.set_page_size(size);
        Ok(())
    }

    fn render_internal(&self) -> Result<Vec<u8>, String> {
        InvoiceRenderer::new(self.style.clone())
            .render(&self.request)
            .map_err(|e| e.to_string())
    }
}

#[wasm_bindgen]
impl InvoiceSession {
    /// New session over the built-in sample practice data
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// New session over a `{"cases": [...], "clients": [...]}` directory
    #[wasm_bindgen(js_name = fromDirectory)]
    pub fn from_directory(json: &str) -> Result<InvoiceSession, JsValue> {
        let directory = InMemoryDirectory::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_directory(directory))
    }

    #[wasm_bindgen(js_name = setInvoice)]
    pub fn set_invoice(&mut self, json: &str) -> Result<(), JsValue> {
        self.set_invoice_internal(json).map_err(|e| JsValue::from_str(&e))
    }

    /// Returns the new line-item count
    #[wasm_bindgen(js_name = addExpense)]
    pub fn add_expense(&mut self, json: &str) -> Result<usize, JsValue> {
        self.add_expense_internal(json).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = addTimeEntry)]
    pub fn add_time_entry(&mut self, json: &str) -> Result<usize, JsValue> {
        self.add_time_entry_internal(json).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = clearLineItems)]
    pub fn clear_line_items(&mut self) {
        self.request.expenses.clear();
        self.request.time_entries.clear();
    }

    /// Empty string clears the issuer
    #[wasm_bindgen(js_name = setIssuer)]
    pub fn set_issuer(&mut self, json: &str) -> Result<(), JsValue> {
        self.set_party_internal(json, false).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = setClient)]
    pub fn set_client(&mut self, json: &str) -> Result<(), JsValue> {
        self.set_party_internal(json, true).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = selectCase)]
    pub fn select_case(&mut self, case_id: &str) -> Result<(), JsValue> {
        self.select_case_internal(case_id).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(getter, js_name = selectedCase)]
    pub fn selected_case(&self) -> Option<String> {
        self.selected_case.clone()
    }

    /// Case ids for the case picker, in directory order
    #[wasm_bindgen(js_name = caseIds)]
    pub fn case_ids(&self) -> js_sys::Array {
        self.directory
            .cases()
            .into_iter()
            .map(|case| JsValue::from_str(&case.id))
            .collect()
    }

    #[wasm_bindgen(js_name = setCurrencySymbol)]
    pub fn set_currency_symbol(&mut self, symbol: &str) {
        self.style.set_currency_symbol(symbol);
    }

    /// "a4" or "letter"
    #[wasm_bindgen(js_name = setPageSize)]
    pub fn set_page_size(&mut self, size: &str) -> Result<(), JsValue> {
        self.set_page_size_internal(size).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = setFooterNote)]
    pub fn set_footer_note(&mut self, note: Option<String>) {
        self.style.set_footer_note(note);
    }

    #[wasm_bindgen(js_name = lineItemCount)]
    pub fn line_item_count(&self) -> usize {
        self.request.line_item_count()
    }

    /// Current request as JSON, for saving drafts
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.request)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn render(&self) -> Result<Vec<u8>, JsValue> {
        self.render_internal().map_err(|e| JsValue::from_str(&e))
    }

    /// Render, returning an empty array on failure; the reason goes to the console
    #[wasm_bindgen(js_name = renderOrEmpty)]
    pub fn render_or_empty(&self) -> Vec<u8> {
        crate::empty_on_error(self.render_internal(), |e| crate::web_log(e))
    }
}
