//! Render invoices from JSON files on the command line

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use invoice_pdf::{ArtifactInfo, InvoiceRenderer, InvoiceStyle, PageSize};
use legal_types::{Directory, Expense, InMemoryDirectory, Invoice, InvoiceRequest, PartyInfo, TimeEntry};

#[derive(Parser, Debug)]
#[command(name = "invoice-cli")]
#[command(version, about = "Render a legal invoice to PDF")]
pub struct Args {
    /// InvoiceRequest JSON document
    #[arg(short, long, required_unless_present = "sample", conflicts_with = "sample")]
    pub input: Option<PathBuf>,

    /// Where to write the PDF
    #[arg(short, long)]
    pub output: PathBuf,

    /// Partial InvoiceStyle JSON; missing fields use defaults
    #[arg(long)]
    pub style: Option<PathBuf>,

    /// Currency symbol, overriding the style file
    #[arg(long)]
    pub currency: Option<String>,

    /// a4 or letter, overriding the style file
    #[arg(long)]
    pub page_size: Option<PageSize>,

    /// Render a built-in sample invoice instead of --input
    #[arg(long)]
    pub sample: bool,
}

/// Summary of one finished render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub output: PathBuf,
    pub pages: u32,
    pub bytes: usize,
}

pub fn load_style(args: &Args) -> Result<InvoiceStyle> {
    let mut style = match &args.style {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read style file {}", path.display()))?;
            InvoiceStyle::from_json(&json)
                .with_context(|| format!("Invalid style file {}", path.display()))?
        }
        None => InvoiceStyle::default(),
    };

    if let Some(symbol) = &args.currency {
        style.set_currency_symbol(symbol.as_str());
    }
    if let Some(size) = args.page_size {
        style.set_page_size(size);
    }
    style.validate().context("Invalid style")?;
    Ok(style)
}

pub fn load_request(path: &Path) -> Result<InvoiceRequest> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read invoice {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid invoice JSON in {}", path.display()))
}

/// Invoice for the first case in `directory`, billed to that case's client
pub fn sample_request(directory: &dyn Directory) -> InvoiceRequest {
    let mut request = InvoiceRequest::new(
        Invoice::new(1250.0)
            .with_number("INV-2025-031")
            .with_dates("2025-05-23", "2025-06-22"),
    );
    request.issuer = Some(
        PartyInfo::named("Adv. Kavita Rao")
            .with_email("kavita@raolaw.example")
            .with_address("12 Residency Road, Bengaluru"),
    );
    if let Some(case) = directory.cases().first() {
        request.case_ref = Some(case.to_reference());
        request.client = directory.client_for_case(&case.id).map(|c| c.to_party());
    }
    request.expenses = vec![Expense::new(
        "Client meeting transportation",
        Some("2025-05-20"),
        45.0,
    )];
    request.time_entries = vec![TimeEntry::new("Research", Some("2025-05-22"), 1.5, 250.0)];
    request
}

pub fn run(args: &Args) -> Result<RenderSummary> {
    let style = load_style(args)?;
    let request = match (&args.input, args.sample) {
        (_, true) => sample_request(&InMemoryDirectory::sample()),
        (Some(path), false) => load_request(path)?,
        (None, false) => bail!("Either --input or --sample is required"),
    };

    tracing::info!(
        expenses = request.expenses.len(),
        time_entries = request.time_entries.len(),
        "Rendering invoice"
    );

    let bytes = InvoiceRenderer::new(style)
        .render(&request)
        .context("Failed to render invoice")?;
    let info = ArtifactInfo::inspect(&bytes).context("Rendered invoice is not a usable PDF")?;

    fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(RenderSummary {
        output: args.output.clone(),
        pages: info.page_count,
        bytes: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("invoice-cli").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_full_args() {
        let args = parse(&[
            "--input",
            "in.json",
            "--output",
            "out.pdf",
            "--currency",
            "$",
            "--page-size",
            "letter",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("in.json")));
        assert_eq!(args.output, PathBuf::from("out.pdf"));
        assert_eq!(args.currency.as_deref(), Some("$"));
        assert_eq!(args.page_size, Some(PageSize::Letter));
        assert!(!args.sample);
    }

    #[test]
    fn test_input_or_sample_required() {
        assert!(Args::try_parse_from(["invoice-cli", "--output", "out.pdf"]).is_err());
        assert!(Args::try_parse_from(["invoice-cli", "--sample", "-o", "out.pdf"]).is_ok());
        assert!(
            Args::try_parse_from(["invoice-cli", "--sample", "-i", "x.json", "-o", "out.pdf"])
                .is_err()
        );
    }

    #[test]
    fn test_unknown_page_size_rejected() {
        assert!(Args::try_parse_from([
            "invoice-cli",
            "--sample",
            "-o",
            "out.pdf",
            "--page-size",
            "tabloid"
        ])
        .is_err());
    }

    #[test]
    fn test_flags_override_style_file() {
        let dir = tempfile::tempdir().unwrap();
        let style_path = dir.path().join("style.json");
        fs::write(&style_path, r#"{"currencySymbol": "€", "pageSize": "a4"}"#).unwrap();

        let args = parse(&[
            "--sample",
            "-o",
            "out.pdf",
            "--style",
            style_path.to_str().unwrap(),
            "--page-size",
            "letter",
        ]);
        let style = load_style(&args).unwrap();
        assert_eq!(style.currency_symbol(), "€");
        assert_eq!(style.page_size(), PageSize::Letter);
    }

    #[test]
    fn test_sample_request_uses_directory() {
        let request = sample_request(&InMemoryDirectory::sample());
        assert!(request.case_ref.is_some());
        assert_eq!(
            request.client.as_ref().and_then(|c| c.display_name()),
            Some("Rajesh Kumar")
        );
        assert_eq!(request.line_item_count(), 2);
    }

    #[test]
    fn test_run_sample_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("invoice.pdf");
        let args = parse(&["--sample", "-o", output.to_str().unwrap()]);

        let summary = run(&args).unwrap();
        assert_eq!(summary.pages, 1);
        let written = fs::read(&output).unwrap();
        assert_eq!(written.len(), summary.bytes);
        assert!(invoice_pdf::is_usable(&written));
    }

    #[test]
    fn test_run_from_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("request.json");
        let output = dir.path().join("invoice.pdf");
        fs::write(
            &input,
            r#"{"invoice": {"invoiceNumber": "INV-1", "amount": 300}, "expenses": [{"description": "Notary", "amount": 300}]}"#,
        )
        .unwrap();

        let args = parse(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
        run(&args).unwrap();
        assert!(invoice_pdf::is_usable(&fs::read(&output).unwrap()));
    }

    #[test]
    fn test_run_reports_render_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("request.json");
        fs::write(&input, r#"{"invoice": {"amount": -1}}"#).unwrap();
        let output = dir.path().join("invoice.pdf");

        let args = parse(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
        let err = run(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid invoice amount"));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_file() {
        let args = parse(&["-i", "/nonexistent/request.json", "-o", "out.pdf"]);
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to read invoice"));
    }
}
