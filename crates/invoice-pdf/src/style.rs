//! Invoice formatting preferences
//!
//! Every preference is a named field with its own setter, so the front-end's
//! preference editor maps each control to one method call. Deserializing
//! from JSON fills missing fields with defaults.

use serde::{Deserialize, Serialize};

use crate::error::StyleError;

/// Minimum usable width and height left after margins, in points
const MIN_CONTENT_EXTENT: f32 = 200.0;

/// Page format. One render always uses a single size for every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in points
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSize::A4 => write!(f, "a4"),
            PageSize::Letter => write!(f, "letter"),
        }
    }
}

impl std::str::FromStr for PageSize {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" | "us-letter" => Ok(PageSize::Letter),
            other => Err(StyleError::UnknownPageSize(other.to_string())),
        }
    }
}

/// RGB color with components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const GRAY: Rgb = Rgb::new(0.45, 0.45, 0.45);
    pub const LIGHT_GRAY: Rgb = Rgb::new(0.85, 0.85, 0.85);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(color: &str) -> Result<Self, StyleError> {
        let hex = color.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StyleError::InvalidColor(color.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| StyleError::InvalidColor(color.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    fn is_valid(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceStyle {
    currency_symbol: String,
    page_size: PageSize,
    margin: f32,
    base_font_size: f32,
    title_font_size: f32,
    accent_color: Rgb,
    link_color: Rgb,
    title: String,
    footer_note: Option<String>,
}

impl Default for InvoiceStyle {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            page_size: PageSize::A4,
            margin: 40.0,
            base_font_size: 10.0,
            title_font_size: 22.0,
            accent_color: Rgb::new(0.16, 0.32, 0.55),
            link_color: Rgb::new(0.0, 0.35, 0.8),
            title: "INVOICE".to_string(),
            footer_note: Some("Thank you for your business.".to_string()),
        }
    }
}

impl InvoiceStyle {
    /// Parse a (possibly partial) JSON style and validate it
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        let style: Self = serde_json::from_str(json)?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        for (field, value) in [
            ("margin", self.margin),
            ("baseFontSize", self.base_font_size),
            ("titleFontSize", self.title_font_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(StyleError::InvalidSize { field, value });
            }
        }

        let (width, height) = self.page_size.dimensions();
        if width - 2.0 * self.margin < MIN_CONTENT_EXTENT
            || height - 2.0 * self.margin < MIN_CONTENT_EXTENT
        {
            return Err(StyleError::MarginTooLarge {
                margin: self.margin,
                width,
                height,
            });
        }

        for (name, color) in [("accent", self.accent_color), ("link", self.link_color)] {
            if !color.is_valid() {
                return Err(StyleError::InvalidColor(format!(
                    "{} color {:?} out of range",
                    name, color
                )));
            }
        }
        Ok(())
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn base_font_size(&self) -> f32 {
        self.base_font_size
    }

    pub fn title_font_size(&self) -> f32 {
        self.title_font_size
    }

    pub fn accent_color(&self) -> Rgb {
        self.accent_color
    }

    pub fn link_color(&self) -> Rgb {
        self.link_color
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn footer_note(&self) -> Option<&str> {
        self.footer_note.as_deref()
    }

    /// Baseline-to-baseline distance for body text
    pub fn line_height(&self) -> f32 {
        self.base_font_size * 1.4
    }

    pub fn set_currency_symbol(&mut self, symbol: impl Into<String>) -> &mut Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn set_page_size(&mut self, size: PageSize) -> &mut Self {
        self.page_size = size;
        self
    }

    pub fn set_margin(&mut self, margin: f32) -> &mut Self {
        self.margin = margin;
        self
    }

    pub fn set_base_font_size(&mut self, size: f32) -> &mut Self {
        self.base_font_size = size;
        self
    }

    pub fn set_title_font_size(&mut self, size: f32) -> &mut Self {
        self.title_font_size = size;
        self
    }

    pub fn set_accent_color(&mut self, color: Rgb) -> &mut Self {
        self.accent_color = color;
        self
    }

    pub fn set_link_color(&mut self, color: Rgb) -> &mut Self {
        self.link_color = color;
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    /// `None` or a blank note removes the closing line
    pub fn set_footer_note(&mut self, note: Option<String>) -> &mut Self {
        self.footer_note = note.filter(|n| !n.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_style_is_valid() {
        let style = InvoiceStyle::default();
        assert!(style.validate().is_ok());
        assert_eq!(style.currency_symbol(), "₹");
        assert_eq!(style.page_size(), PageSize::A4);
    }

    #[test]
    fn test_setters_chain() {
        let mut style = InvoiceStyle::default();
        style
            .set_currency_symbol("$")
            .set_page_size(PageSize::Letter)
            .set_margin(54.0)
            .set_footer_note(None);
        assert_eq!(style.currency_symbol(), "$");
        assert_eq!(style.page_size().dimensions(), (612.0, 792.0));
        assert_eq!(style.margin(), 54.0);
        assert_eq!(style.footer_note(), None);
    }

    #[test]
    fn test_blank_footer_note_is_removed() {
        let mut style = InvoiceStyle::default();
        style.set_footer_note(Some("  ".into()));
        assert_eq!(style.footer_note(), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let style = InvoiceStyle::from_json(r#"{"currencySymbol": "€", "pageSize": "letter"}"#)
            .unwrap();
        assert_eq!(style.currency_symbol(), "€");
        assert_eq!(style.page_size(), PageSize::Letter);
        assert_eq!(style.base_font_size(), 10.0);
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        let mut style = InvoiceStyle::default();
        style.set_base_font_size(0.0);
        assert!(matches!(
            style.validate(),
            Err(StyleError::InvalidSize { field: "baseFontSize", .. })
        ));

        let mut style = InvoiceStyle::default();
        style.set_margin(f32::NAN);
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_margin_too_large_rejected() {
        let mut style = InvoiceStyle::default();
        style.set_margin(250.0);
        assert!(matches!(
            style.validate(),
            Err(StyleError::MarginTooLarge { .. })
        ));
    }

    #[test]
    fn test_color_out_of_range_rejected() {
        let mut style = InvoiceStyle::default();
        style.set_accent_color(Rgb::new(1.5, 0.0, 0.0));
        assert!(matches!(style.validate(), Err(StyleError::InvalidColor(_))));
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#FFFFFF").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::from_hex("000000").unwrap(), Rgb::BLACK);
        assert!(Rgb::from_hex("#FFF").is_err());
        assert!(Rgb::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_page_size_from_str() {
        assert_eq!("A4".parse::<PageSize>().unwrap(), PageSize::A4);
        assert_eq!("letter".parse::<PageSize>().unwrap(), PageSize::Letter);
        assert!("tabloid".parse::<PageSize>().is_err());
    }
}
