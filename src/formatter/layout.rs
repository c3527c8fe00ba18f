//! Line classification and presentation rules.
//!
//! Generated text is plain lines. Each non-blank line becomes one block;
//! the first matching rule wins:
//!
//! 1. starts with `#`, or is upper-case and longer than 3 characters: heading
//! 2. starts with `•`, `-` or `*`: list item
//! 3. mentions "signature", "sign" or "date:": signature line
//! 4. anything else: body paragraph

use chrono::NaiveDate;

use super::common::format_long_date;

pub const BULLET_GLYPH: char = '•';
const BULLET_MARKERS: [char; 3] = [BULLET_GLYPH, '-', '*'];
const SIGNATURE_KEYWORDS: [&str; 3] = ["signature", "sign", "date:"];
const MIN_SHOUTED_HEADING_CHARS: usize = 4;

/// US Letter with one-inch margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

pub const LETTER_PAGE: PageSetup = PageSetup {
    width: 612.0,
    height: 792.0,
    margin: 72.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const DARK_GRAY: Rgb = Rgb(64, 64, 64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Font and spacing for one block. Sizes and spacing are in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub font_size: f32,
    pub bold: bool,
    pub color: Option<Rgb>,
    pub align: Align,
    pub space_before: f32,
    pub space_after: f32,
    pub indent_left: f32,
}

const BODY_STYLE: BlockStyle = BlockStyle {
    font_size: 11.0,
    bold: false,
    color: None,
    align: Align::Left,
    space_before: 0.0,
    space_after: 6.0,
    indent_left: 0.0,
};

pub const TITLE_STYLE: BlockStyle = BlockStyle {
    font_size: 16.0,
    bold: true,
    color: Some(DARK_GRAY),
    align: Align::Center,
    space_before: 0.0,
    space_after: 20.0,
    indent_left: 0.0,
};

pub const DATE_STYLE: BlockStyle = BlockStyle {
    font_size: 11.0,
    bold: false,
    color: Some(DARK_GRAY),
    align: Align::Right,
    space_before: 0.0,
    space_after: 20.0,
    indent_left: 0.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    ListItem,
    Signature,
    Body,
}

impl BlockKind {
    pub fn style(self) -> BlockStyle {
        match self {
            Self::Heading => BlockStyle {
                font_size: 13.0,
                bold: true,
                color: Some(DARK_GRAY),
                space_before: 15.0,
                space_after: 10.0,
                ..BODY_STYLE
            },
            Self::ListItem => BlockStyle {
                space_before: 3.0,
                space_after: 3.0,
                indent_left: 30.0,
                ..BODY_STYLE
            },
            Self::Signature => BlockStyle {
                space_before: 15.0,
                space_after: 15.0,
                ..BODY_STYLE
            },
            Self::Body => BODY_STYLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

/// Decide how a single line is presented. `None` for blank lines.
pub fn classify(line: &str) -> Option<BlockKind> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('#') || is_upper_case_heading(trimmed) {
        return Some(BlockKind::Heading);
    }

    if trimmed.starts_with(BULLET_MARKERS) {
        return Some(BlockKind::ListItem);
    }

    let lower = line.to_lowercase();
    if SIGNATURE_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return Some(BlockKind::Signature);
    }

    Some(BlockKind::Body)
}

/// Upper-case means: at least one letter and no lower-case letters.
fn is_upper_case_heading(trimmed: &str) -> bool {
    trimmed.chars().count() >= MIN_SHOUTED_HEADING_CHARS
        && trimmed.chars().any(char::is_alphabetic)
        && !trimmed.chars().any(char::is_lowercase)
}

/// Heading text without `#` markers or wrapping `**` emphasis.
fn heading_text(trimmed: &str) -> String {
    let text = trimmed.trim_start_matches('#').trim();
    let text = text
        .strip_prefix("**")
        .and_then(|t| t.strip_suffix("**"))
        .unwrap_or(text);
    text.trim().to_string()
}

fn block_for(line: &str) -> Option<Block> {
    let kind = classify(line)?;
    let text = match kind {
        BlockKind::Heading => heading_text(line.trim()),
        BlockKind::ListItem => line.trim().to_string(),
        BlockKind::Signature | BlockKind::Body => line.trim_end().to_string(),
    };
    Some(Block { kind, text })
}

/// Split generated text into presentation blocks, skipping blank lines.
pub fn layout(text: &str) -> Vec<Block> {
    text.lines().filter_map(block_for).collect()
}

/// Fixed block printed above the generated content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    pub title: String,
    pub subject: String,
    pub date: NaiveDate,
}

impl DocumentHeader {
    pub fn title_line(&self) -> String {
        self.title.to_uppercase()
    }

    pub fn subject_line(&self) -> String {
        format!("For: {}", self.subject)
    }

    pub fn date_line(&self) -> String {
        format!("Date: {}", format_long_date(self.date))
    }
}

/// A document ready to be rendered: header plus classified blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedDocument {
    pub page: PageSetup,
    pub header: DocumentHeader,
    pub blocks: Vec<Block>,
}

impl FormattedDocument {
    pub fn new(text: &str, title: &str, subject: &str, date: NaiveDate) -> Self {
        Self {
            page: LETTER_PAGE,
            header: DocumentHeader {
                title: title.to_string(),
                subject: subject.to_string(),
                date,
            },
            blocks: layout(text),
        }
    }
}
