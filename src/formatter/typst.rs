//! Typst markup for a formatted document.
//!
//! Every block becomes one `#block(...)` call with the text passed as an
//! escaped string literal, so nothing in the generated text is interpreted
//! as markup.

use super::common::escape_typst_string;
use super::layout::{Align, BlockStyle, FormattedDocument, DATE_STYLE, TITLE_STYLE};

const FONT_STACK: &str = r#"("Helvetica", "Arial", "Liberation Sans")"#;

fn styled_block(style: &BlockStyle, text: &str) -> String {
    let mut text_args = vec![format!("size: {}pt", style.font_size)];
    if style.bold {
        text_args.push(r#"weight: "bold""#.to_string());
    }
    if let Some(color) = style.color {
        text_args.push(format!("fill: rgb({}, {}, {})", color.0, color.1, color.2));
    }

    let mut block_args = vec![
        format!("above: {}pt", style.space_before),
        format!("below: {}pt", style.space_after),
    ];
    if style.indent_left > 0.0 {
        block_args.push(format!("inset: (left: {}pt)", style.indent_left));
    }

    let block = format!(
        "block({}, text({}, \"{}\"))",
        block_args.join(", "),
        text_args.join(", "),
        escape_typst_string(text)
    );

    match style.align {
        Align::Left => format!("#{}", block),
        Align::Center => format!("#align(center, {})", block),
        Align::Right => format!("#align(right, {})", block),
    }
}

/// Complete Typst source for `document`.
pub fn to_typst(document: &FormattedDocument) -> String {
    let header = &document.header;
    let page = &document.page;

    let mut lines = vec![
        format!(
            "#set document(title: \"{}\", author: \"{}\")",
            escape_typst_string(&header.title),
            escape_typst_string(&header.subject)
        ),
        format!(
            "#set page(width: {}pt, height: {}pt, margin: {}pt)",
            page.width, page.height, page.margin
        ),
        format!("#set text(font: {}, size: 11pt)", FONT_STACK),
        String::new(),
        styled_block(&TITLE_STYLE, &header.title_line()),
        styled_block(&TITLE_STYLE, &header.subject_line()),
        styled_block(&DATE_STYLE, &header.date_line()),
    ];

    lines.extend(
        document
            .blocks
            .iter()
            .map(|block| styled_block(&block.kind.style(), &block.text)),
    );

    let mut source = lines.join("\n");
    source.push('\n');
    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::layout::BlockKind;
    use chrono::NaiveDate;

    fn document(text: &str) -> FormattedDocument {
        FormattedDocument::new(
            text,
            "Non-Disclosure Agreement (NDA)",
            "Acme Robotics LLC",
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        )
    }

    #[test]
    fn test_header_is_always_emitted() {
        let source = to_typst(&document(""));

        assert!(source.contains("#set page(width: 612pt, height: 792pt, margin: 72pt)"));
        assert!(source.contains(
            r#"#align(center, block(above: 0pt, below: 20pt, text(size: 16pt, weight: "bold", fill: rgb(64, 64, 64), "NON-DISCLOSURE AGREEMENT (NDA)")))"#
        ));
        assert!(source.contains(r#""For: Acme Robotics LLC""#));
        assert!(source.contains(
            r#"#align(right, block(above: 0pt, below: 20pt, text(size: 11pt, fill: rgb(64, 64, 64), "Date: October 19, 2026")))"#
        ));
        assert_eq!(source.matches("#block(").count(), 0);
    }

    #[test]
    fn test_block_markup_per_kind() {
        let doc = document("TERMS\n- Item one\nSignature: ____\nRegular line.");
        assert_eq!(
            doc.blocks.iter().map(|b| b.kind).collect::<Vec<_>>(),
            vec![
                BlockKind::Heading,
                BlockKind::ListItem,
                BlockKind::Signature,
                BlockKind::Body
            ]
        );

        let source = to_typst(&doc);
        assert!(source.contains(
            r#"#block(above: 15pt, below: 10pt, text(size: 13pt, weight: "bold", fill: rgb(64, 64, 64), "TERMS"))"#
        ));
        assert!(source.contains(
            r#"#block(above: 3pt, below: 3pt, inset: (left: 30pt), text(size: 11pt, "- Item one"))"#
        ));
        assert!(source.contains(
            r#"#block(above: 15pt, below: 15pt, text(size: 11pt, "Signature: ____"))"#
        ));
        assert!(source.contains(r#"#block(above: 0pt, below: 6pt, text(size: 11pt, "Regular line."))"#));
    }

    #[test]
    fn test_markup_characters_are_escaped() {
        let source = to_typst(&document(r#"Pay $5 to "Vendor" #1 = done \ ok"#));
        assert!(source.contains(r#""Pay $5 to \"Vendor\" #1 = done \\ ok""#));
    }

    #[test]
    fn test_output_is_deterministic() {
        let text = "# SCOPE\nBody text.\n* bullet";
        assert_eq!(to_typst(&document(text)), to_typst(&document(text)));
    }
}
