//! Subset of the Google Docs `documents.get` response this crate reads.

use serde::Deserialize;

use crate::domains::lenient;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "lenient::option")]
    pub document_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub revision_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub body: Option<Body>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub document_style: Option<DocumentStyle>,
}

impl Document {
    pub fn title_or_default(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or("Untitled Document")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Body {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub content: Vec<Block>,
}

/// One structural element of a document body or table cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    /// Section breaks, tables of contents and anything newer.
    Other,
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default, deserialize_with = "lenient::option")]
    paragraph: Option<Paragraph>,
    #[serde(default, deserialize_with = "lenient::option")]
    table: Option<Table>,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        match (raw.paragraph, raw.table) {
            (Some(paragraph), _) => Self::Paragraph(paragraph),
            (None, Some(table)) => Self::Table(table),
            (None, None) => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub elements: Vec<ParagraphElement>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub paragraph_style: Option<ParagraphStyle>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub bullet: Option<Bullet>,
}

impl Paragraph {
    /// Heading level 1-4 derived from the named style (`HEADING_2` → 2).
    ///
    /// Headings past level 3 all map to 4.
    pub fn heading_level(&self) -> Option<usize> {
        let style = self
            .paragraph_style
            .as_ref()?
            .named_style_type
            .as_deref()?;
        if !style.contains("HEADING") {
            return None;
        }
        Some(if style.contains('1') {
            1
        } else if style.contains('2') {
            2
        } else if style.contains('3') {
            3
        } else {
            4
        })
    }

    /// List nesting depth when this paragraph is a bullet item.
    pub fn list_level(&self) -> Option<usize> {
        self.bullet
            .as_ref()
            .map(|bullet| bullet.nesting_level.unwrap_or(0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(default, deserialize_with = "lenient::option")]
    pub named_style_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bullet {
    #[serde(default, deserialize_with = "lenient::option")]
    pub nesting_level: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default, deserialize_with = "lenient::option")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::option")]
    pub text_style: Option<TextStyle>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct TextStyle {
    #[serde(default, deserialize_with = "lenient::option")]
    pub bold: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub italic: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub underline: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableCell {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStyle {
    #[serde(default, deserialize_with = "lenient::option")]
    pub page_size: Option<PageSize>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub margin_top: Option<Dimension>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub margin_bottom: Option<Dimension>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub margin_left: Option<Dimension>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub margin_right: Option<Dimension>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSize {
    #[serde(default, deserialize_with = "lenient::option")]
    pub width: Option<Dimension>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub height: Option<Dimension>,
}

/// A length with its unit, usually points (`PT`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dimension {
    #[serde(default, deserialize_with = "lenient::option")]
    pub magnitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub unit: Option<String>,
}
