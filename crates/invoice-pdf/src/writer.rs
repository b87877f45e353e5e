//! Serialize a laid-out invoice with lopdf

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::RenderError;
use crate::layout::{Element, InvoiceLayout, PageLayout, Rect};
use crate::metrics::{encode_win_ansi, Font};
use crate::style::Rgb;

const PRODUCER: &str = concat!("invoice-pdf ", env!("CARGO_PKG_VERSION"));
const CREATOR: &str = "legalpad invoice-pdf";

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn literal(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Literal)
}

fn color_operands(color: Rgb) -> Vec<Object> {
    vec![real(color.r), real(color.g), real(color.b)]
}

fn font_dictionary(font: Font) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// PDF rectangle `[llx lly urx ury]` for a top-down rect
fn pdf_rect(rect: &Rect, page_height: f32) -> Vec<Object> {
    vec![
        real(rect.x),
        real(page_height - (rect.y + rect.height)),
        real(rect.x + rect.width),
        real(page_height - rect.y),
    ]
}

/// Content stream operations for one page
fn page_operations(page: &PageLayout, page_height: f32) -> Vec<Operation> {
    let mut ops = Vec::new();

    for element in &page.elements {
        match element {
            Element::Text {
                x,
                y,
                text,
                font,
                size,
                color,
            } => {
                ops.push(Operation::new("rg", color_operands(*color)));
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font.resource_name().to_vec()), real(*size)],
                ));
                ops.push(Operation::new("Td", vec![real(*x), real(page_height - y)]));
                ops.push(Operation::new("Tj", vec![literal(text)]));
                ops.push(Operation::new("ET", vec![]));
            }
            Element::Rule {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                ops.push(Operation::new("RG", color_operands(*color)));
                ops.push(Operation::new("w", vec![real(*width)]));
                ops.push(Operation::new("m", vec![real(*x1), real(page_height - y1)]));
                ops.push(Operation::new("l", vec![real(*x2), real(page_height - y2)]));
                ops.push(Operation::new("S", vec![]));
            }
            Element::Fill { rect, color } => {
                ops.push(Operation::new("rg", color_operands(*color)));
                ops.push(Operation::new(
                    "re",
                    vec![
                        real(rect.x),
                        real(page_height - (rect.y + rect.height)),
                        real(rect.width),
                        real(rect.height),
                    ],
                ));
                ops.push(Operation::new("f", vec![]));
            }
            // Links are annotations, not page content
            Element::Link { .. } => {}
        }
    }

    ops
}

fn link_annotation(rect: &Rect, uri: &str, page_height: f32) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => pdf_rect(rect, page_height),
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        "A" => dictionary! {
            "S" => "URI",
            // URIs are 7-bit ASCII by definition
            "URI" => Object::String(uri.as_bytes().to_vec(), StringFormat::Literal),
        },
    }
}

fn add_page(
    doc: &mut Document,
    page: &PageLayout,
    layout: &InvoiceLayout,
    pages_id: ObjectId,
    resources_id: ObjectId,
) -> Result<ObjectId, RenderError> {
    let content = Content {
        operations: page_operations(page, layout.page_height),
    };
    let encoded = content
        .encode()
        .map_err(|e| RenderError::Serialize(format!("page {}: {}", page.number, e)))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let annotations: Vec<Object> = page
        .elements
        .iter()
        .filter_map(|element| match element {
            Element::Link { rect, uri } => Some(link_annotation(rect, uri, layout.page_height)),
            _ => None,
        })
        .map(|annot| Object::Reference(doc.add_object(annot)))
        .collect();

    let mut page_dict = dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), real(layout.page_width), real(layout.page_height)],
        "Contents" => Object::Reference(content_id),
        "Resources" => Object::Reference(resources_id),
    };
    if !annotations.is_empty() {
        page_dict.set("Annots", Object::Array(annotations));
    }

    Ok(doc.add_object(page_dict))
}

/// Write the layout as a PDF 1.7 byte stream
pub fn write_pdf(layout: &InvoiceLayout) -> Result<Vec<u8>, RenderError> {
    if layout.pages.is_empty() {
        return Err(RenderError::Layout("layout has no pages".to_string()));
    }

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(Font::Regular));
    let bold_id = doc.add_object(font_dictionary(Font::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(regular_id),
            "F2" => Object::Reference(bold_id),
        },
    });

    let mut kids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let page_id = add_page(&mut doc, page, layout, pages_id, resources_id)?;
        kids.push(Object::Reference(page_id));
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut info = dictionary! {
        "Title" => literal(&layout.document_title),
        "Creator" => literal(CREATOR),
        "Producer" => literal(PRODUCER),
    };
    if let Some(author) = &layout.author {
        info.set("Author", literal(author));
    }
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", Object::Reference(info_id));

    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Serialize(e.to_string()))?;
    Ok(buffer)
}
