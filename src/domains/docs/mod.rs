//! Google Docs document model, text extraction and in-document search.

mod content;
mod model;

pub use content::{ContentFormat, EMPTY_DOCUMENT, LineMatch, extract_content, search_lines};
pub use model::{
    Block, Body, Bullet, Dimension, Document, DocumentStyle, PageSize, Paragraph,
    ParagraphElement, ParagraphStyle, Table, TableCell, TableRow, TextRun, TextStyle,
};
