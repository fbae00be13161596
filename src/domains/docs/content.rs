//! Flatten a document body into text and search it line by line.

use serde::{Deserialize, Serialize};

use super::model::{Block, Document, Paragraph, Table, TableCell, TextRun};

pub const EMPTY_DOCUMENT: &str = "Document appears to be empty.";

/// Text renderings of a document body.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// Bare text; tables as `|`-separated rows.
    Plain,
    /// Markdown: headings, `-` bullets, emphasis and pipe tables.
    Markdown,
    /// Readable outline: headings and `•` bullets without inline emphasis.
    #[default]
    Structured,
}

/// Render the document body, one blank line between blocks.
pub fn extract_content(document: &Document, format: ContentFormat) -> String {
    let blocks = match &document.body {
        Some(body) if !body.content.is_empty() => &body.content,
        _ => return EMPTY_DOCUMENT.to_string(),
    };

    let mut parts = Vec::new();
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => {
                let text = paragraph_text(paragraph, format);
                if !text.trim().is_empty() {
                    parts.push(text);
                }
            }
            Block::Table(table) => {
                let text = table_text(table, format);
                if !text.is_empty() {
                    parts.push(text);
                }
            }
            Block::Other => {}
        }
    }

    parts.join("\n\n").trim().to_string()
}

fn paragraph_text(paragraph: &Paragraph, format: ContentFormat) -> String {
    let mut text = String::new();
    for run in paragraph.elements.iter().filter_map(|e| e.text_run.as_ref()) {
        if format == ContentFormat::Markdown {
            text.push_str(&emphasize(run));
        } else {
            text.push_str(&run.content);
        }
    }
    let text = text.trim_end_matches('\n');

    if format == ContentFormat::Plain {
        return text.to_string();
    }

    if let Some(level) = paragraph.heading_level() {
        return format!("{} {}", "#".repeat(level), text);
    }

    if let Some(level) = paragraph.list_level() {
        let indent = "  ".repeat(level);
        let marker = match format {
            ContentFormat::Markdown => "-",
            _ => "•",
        };
        return format!("{indent}{marker} {text}");
    }

    text.to_string()
}

/// Wrap a run in markdown emphasis, keeping its surrounding whitespace
/// outside the markers.
fn emphasize(run: &TextRun) -> String {
    let Some(style) = run.text_style else {
        return run.content.clone();
    };

    let core = run.content.trim();
    if core.is_empty() {
        return run.content.clone();
    }

    let mut wrapped = core.to_string();
    if style.bold == Some(true) {
        wrapped = format!("**{wrapped}**");
    }
    if style.italic == Some(true) {
        wrapped = format!("*{wrapped}*");
    }
    if style.underline == Some(true) {
        wrapped = format!("<u>{wrapped}</u>");
    }

    let leading = &run.content[..run.content.len() - run.content.trim_start().len()];
    let trailing = &run.content[run.content.trim_end().len()..];
    format!("{leading}{wrapped}{trailing}")
}

fn table_text(table: &Table, format: ContentFormat) -> String {
    if table.table_rows.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    if format == ContentFormat::Markdown {
        for (index, row) in table.table_rows.iter().enumerate() {
            let mut line = String::from("|");
            for cell in &row.table_cells {
                line.push_str(&format!(" {} |", cell_text(cell)));
            }
            lines.push(line);

            if index == 0 {
                let columns = row.table_cells.len().max(1);
                lines.push(format!("|{}", " --- |".repeat(columns)));
            }
        }
    } else {
        lines.push("**Table:**".to_string());
        lines.push(String::new());
        for row in &table.table_rows {
            let cells: Vec<String> = row.table_cells.iter().map(cell_text).collect();
            lines.push(cells.join(" | "));
        }
    }
    lines.join("\n")
}

/// Cell text on a single line, paragraphs rendered plain.
fn cell_text(cell: &TableCell) -> String {
    let mut text = String::new();
    for block in &cell.content {
        if let Block::Paragraph(paragraph) = block {
            for run in paragraph.elements.iter().filter_map(|e| e.text_run.as_ref()) {
                text.push_str(&run.content);
            }
        }
    }
    text.trim().replace('\n', " ")
}

/// A line containing the search text, with its surrounding lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// 1-based.
    pub line_number: usize,
    pub line: String,
    pub context: String,
}

/// Case-insensitive substring search over the lines of `text`.
pub fn search_lines(text: &str, needle: &str, context_lines: usize) -> Vec<LineMatch> {
    let needle = needle.to_lowercase();
    let lines: Vec<&str> = text.split('\n').collect();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.to_lowercase().contains(&needle))
        .map(|(index, line)| {
            let start = index.saturating_sub(context_lines);
            let end = index
                .saturating_add(context_lines)
                .saturating_add(1)
                .min(lines.len());
            LineMatch {
                line_number: index + 1,
                line: line.to_string(),
                context: lines[start..end].join("\n"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Document {
        serde_json::from_value(json!({
            "documentId": "doc-1",
            "title": "Launch plan",
            "body": {"content": [
                {"sectionBreak": {}},
                {"paragraph": {
                    "paragraphStyle": {"namedStyleType": "HEADING_1"},
                    "elements": [{"textRun": {"content": "Overview\n"}}]
                }},
                {"paragraph": {
                    "elements": [
                        {"textRun": {"content": "Ship the "}},
                        {"textRun": {"content": "beta", "textStyle": {"bold": true}}},
                        {"textRun": {"content": " on Friday.\n"}}
                    ]
                }},
                {"paragraph": {
                    "bullet": {"nestingLevel": 1},
                    "elements": [{"textRun": {"content": "Write notes\n"}}]
                }},
                {"paragraph": {"elements": [{"textRun": {"content": "\n"}}]}},
                {"table": {"tableRows": [
                    {"tableCells": [
                        {"content": [{"paragraph": {"elements": [{"textRun": {"content": "Owner\n"}}]}}]},
                        {"content": [{"paragraph": {"elements": [{"textRun": {"content": "Task\n"}}]}}]}
                    ]},
                    {"tableCells": [
                        {"content": [{"paragraph": {"elements": [{"textRun": {"content": "Sam\n"}}]}}]},
                        {"content": [{"paragraph": {"elements": [{"textRun": {"content": "QA\npass\n"}}]}}]}
                    ]}
                ]}}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn test_markdown_rendering() {
        let text = extract_content(&document(), ContentFormat::Markdown);
        assert_eq!(
            text,
            "# Overview\n\n\
             Ship the **beta** on Friday.\n\n  \
             - Write notes\n\n\
             | Owner | Task |\n| --- | --- |\n| Sam | QA pass |"
        );
    }

    #[test]
    fn test_structured_rendering() {
        let text = extract_content(&document(), ContentFormat::Structured);
        assert!(text.starts_with("# Overview\n\nShip the beta on Friday."));
        assert!(text.contains("  • Write notes"));
        assert!(text.contains("**Table:**\n\nOwner | Task\nSam | QA pass"));
    }

    #[test]
    fn test_plain_rendering_has_no_markup() {
        let text = extract_content(&document(), ContentFormat::Plain);
        assert!(text.starts_with("Overview\n\nShip the beta on Friday.\n\nWrite notes"));
        assert!(!text.contains('#'));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(extract_content(&Document::default(), ContentFormat::Plain), EMPTY_DOCUMENT);
        let doc: Document = serde_json::from_value(json!({"body": {"content": "nope"}})).unwrap();
        assert_eq!(extract_content(&doc, ContentFormat::Markdown), EMPTY_DOCUMENT);
    }

    #[test]
    fn test_search_lines_with_context() {
        let text = "alpha\nbeta\nGamma ray\ndelta\nepsilon";
        let matches = search_lines(text, "gamma", 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line_number, 3);
        assert_eq!(matches[0].line, "Gamma ray");
        assert_eq!(matches[0].context, "beta\nGamma ray\ndelta");

        let matches = search_lines(text, "A", 5);
        assert_eq!(matches.len(), 4);
        assert_eq!(matches[0].context, text);
    }

    #[test]
    fn test_search_lines_huge_context() {
        let matches = search_lines("alpha\nbeta\ngamma", "beta", usize::MAX);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line_number, 2);
        assert_eq!(matches[0].context, "alpha\nbeta\ngamma");
    }

    #[test]
    fn test_search_lines_no_match() {
        assert!(search_lines("one\ntwo", "three", 2).is_empty());
    }
}
