//! WASM bindings for the invoice renderer
//!
//! Rendering happens entirely in the browser. The front-end either posts a
//! whole `InvoiceRequest` JSON document to one of the free functions, or builds
//! the invoice up field by field through an [`InvoiceSession`].
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { InvoiceSession, render_invoice_json } from './pkg/invoice_wasm.js';
//!
//! await init();
//!
//! // One-shot
//! const pdf = render_invoice_json(JSON.stringify(request), null);
//!
//! // Stateful
//! const session = new InvoiceSession();
//! session.setInvoice(JSON.stringify({ invoiceNumber: "INV-7", amount: 1250 }));
//! session.selectCase("case-1");
//! session.addExpense(JSON.stringify({ description: "Court fee", amount: 500 }));
//! downloadBlob(session.render(), "invoice.pdf");
//! ```

pub mod session;

use base64::Engine;
use invoice_pdf::{ArtifactInfo, InvoiceRenderer, InvoiceStyle};
use legal_types::InvoiceRequest;
use wasm_bindgen::prelude::*;

pub use session::InvoiceSession;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn renderer_for(style_json: Option<&str>) -> Result<InvoiceRenderer, String> {
    let style = match style_json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => InvoiceStyle::from_json(json).map_err(|e| e.to_string())?,
        None => InvoiceStyle::default(),
    };
    Ok(InvoiceRenderer::new(style))
}

fn parse_request(request_json: &str) -> Result<InvoiceRequest, String> {
    serde_json::from_str(request_json).map_err(|e| format!("Failed to parse invoice: {}", e))
}

/// Render a request document (testable without JsValue)
pub(crate) fn render_json_internal(
    request_json: &str,
    style_json: Option<&str>,
) -> Result<Vec<u8>, String> {
    let renderer = renderer_for(style_json)?;
    let request = parse_request(request_json)?;
    renderer.render(&request).map_err(|e| e.to_string())
}

/// Render an `InvoiceRequest` JSON document to PDF bytes
///
/// `style_json` is an optional partial `InvoiceStyle`; missing fields use
/// defaults.
#[wasm_bindgen]
pub fn render_invoice_json(request_json: &str, style_json: Option<String>) -> Result<Vec<u8>, JsValue> {
    render_json_internal(request_json, style_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Render with the empty-on-failure contract
///
/// Never throws. An empty array means rendering failed; the reason goes to
/// the browser console.
#[wasm_bindgen]
pub fn render_invoice_legacy(request_json: &str) -> Vec<u8> {
    empty_on_error(render_json_internal(request_json, None), |e| web_log(e))
}

/// Bytes on success; otherwise hands the error to `log` and returns nothing
pub(crate) fn empty_on_error(result: Result<Vec<u8>, String>, log: impl FnOnce(&str)) -> Vec<u8> {
    match result {
        Ok(bytes) => bytes,
        Err(e) => {
            log(&e);
            Vec::new()
        }
    }
}

/// Render to a base64 string, for hosts that embed the PDF in a data URL
#[wasm_bindgen]
pub fn render_invoice_base64(request_json: &str, style_json: Option<String>) -> Result<String, JsValue> {
    let bytes =
        render_json_internal(request_json, style_json.as_deref()).map_err(|e| JsValue::from_str(&e))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Page count, version, and size of rendered bytes
#[wasm_bindgen]
pub fn inspect_artifact(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info = ArtifactInfo::inspect(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// True when `bytes` holds a usable PDF; false for the legacy empty artifact
#[wasm_bindgen]
pub fn is_usable_artifact(bytes: &[u8]) -> bool {
    invoice_pdf::is_usable(bytes)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub(crate) fn web_log(s: &str);
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn web_log(message: &str) {
    eprintln!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "invoice": {
            "invoiceNumber": "INV-2025-031",
            "issueDate": "2025-05-23",
            "amount": 1250.0
        },
        "expenses": [
            {"description": "Client meeting transportation", "date": "2025-05-20", "amount": 45.0}
        ],
        "timeEntries": [
            {"description": "Research", "date": "2025-05-22", "hours": 1.5, "rate": 250.0}
        ]
    }"#;

    #[test]
    fn test_get_version() {
        assert!(!get_version().is_empty());
    }

    #[test]
    fn test_render_json() {
        let bytes = render_json_internal(SCENARIO, None).unwrap();
        assert!(invoice_pdf::is_usable(&bytes));
    }

    #[test]
    fn test_render_json_with_partial_style() {
        let bytes = render_json_internal(SCENARIO, Some(r#"{"pageSize": "letter"}"#)).unwrap();
        let runs: Vec<String> = invoice_pdf::extract_text_runs(&bytes)
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert!(runs.iter().any(|r| r == "Total: Rs.1250.00"));
    }

    #[test]
    fn test_blank_style_means_default() {
        assert!(render_json_internal(SCENARIO, Some("  ")).is_ok());
    }

    #[test]
    fn test_bad_json_reports_parse_error() {
        let err = render_json_internal("{not json", None).unwrap_err();
        assert!(err.starts_with("Failed to parse invoice"));
    }

    #[test]
    fn test_missing_amount_is_rejected() {
        assert!(render_json_internal(r#"{"invoice": {}}"#, None).is_err());
    }

    #[test]
    fn test_legacy_returns_empty_on_failure() {
        assert!(render_invoice_legacy("{not json").is_empty());
        assert!(render_invoice_legacy(r#"{"invoice": {"amount": -5}}"#).is_empty());
        assert!(!render_invoice_legacy(SCENARIO).is_empty());
    }

    #[test]
    fn test_legacy_failure_is_logged() {
        let mut logged = Vec::new();
        let bytes = empty_on_error(
            render_json_internal(r#"{"invoice": {"amount": -5}}"#, None),
            |e| logged.push(e.to_string()),
        );
        assert!(bytes.is_empty());
        assert_eq!(logged.len(), 1);
        assert!(logged[0].contains("Invalid invoice amount"), "{}", logged[0]);

        let mut logged = Vec::new();
        let bytes = empty_on_error(render_json_internal(SCENARIO, None), |e| logged.push(e.to_string()));
        assert!(invoice_pdf::is_usable(&bytes));
        assert!(logged.is_empty());
    }

    #[test]
    fn test_is_usable_artifact() {
        assert!(!is_usable_artifact(&[]));
        let bytes = render_json_internal(SCENARIO, None).unwrap();
        assert!(is_usable_artifact(&bytes));
    }
}
