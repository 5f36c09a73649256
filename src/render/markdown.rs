//! Markdown rendering of [`RichOutput`].

use super::{Block, Inline, RichOutput, UrlBuilder};

/// Render rich output as Markdown, resolving links through `urls`.
///
/// Blocks are separated by a blank line; the result always ends with a newline
/// unless there are no blocks at all.
pub fn render_markdown(rich: &RichOutput, urls: &dyn UrlBuilder) -> String {
    let rendered: Vec<String> = rich
        .blocks()
        .iter()
        .map(|block| render_block(block, urls))
        .collect();
    rendered.join("\n")
}

fn render_block(block: &Block, urls: &dyn UrlBuilder) -> String {
    let mut md = String::new();
    match block {
        Block::Heading(text) => {
            md.push_str(&format!("### {text}\n"));
        }
        Block::Paragraph(inlines) => {
            md.push_str(&render_inlines(inlines, urls));
            md.push('\n');
        }
        Block::List(items) => {
            for item in items {
                md.push_str(&format!("- {}\n", render_inlines(item, urls)));
            }
        }
        Block::Table {
            header,
            rows,
            highlight,
        } => render_table(&mut md, header, rows, *highlight, urls),
        Block::Preformatted(text) => {
            md.push_str("```\n");
            md.push_str(text);
            if !text.ends_with('\n') {
                md.push('\n');
            }
            md.push_str("```\n");
        }
    }
    md
}

fn render_table(
    md: &mut String,
    header: &[Inline],
    rows: &[Vec<Inline>],
    highlight: Option<usize>,
    urls: &dyn UrlBuilder,
) {
    let cell = |i: usize, inline: &Inline| {
        let text = render_inline(inline, urls).replace('|', "\\|");
        if highlight == Some(i) {
            format!("**{text}**")
        } else {
            text
        }
    };

    let head: Vec<String> = header.iter().enumerate().map(|(i, h)| cell(i, h)).collect();
    md.push_str(&format!("| {} |\n", head.join(" | ")));
    md.push_str(&format!("|{}\n", " --- |".repeat(header.len())));

    for row in rows {
        let cells: Vec<String> = row.iter().enumerate().map(|(i, c)| cell(i, c)).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
}

fn render_inlines(inlines: &[Inline], urls: &dyn UrlBuilder) -> String {
    inlines.iter().map(|i| render_inline(i, urls)).collect()
}

fn render_inline(inline: &Inline, urls: &dyn UrlBuilder) -> String {
    match inline {
        Inline::Text(text) => text.clone(),
        Inline::Column(name) => format!("[{name}]({})", urls.column_link(name)),
        Inline::Relationship(a, b) => {
            format!("[{a}-{b}]({})", urls.relationship_link(a, b))
        }
        Inline::Value { column, value } => {
            format!("[{value}]({})", urls.value_link(column, value))
        }
        Inline::Row(index) => format!("[{index}]({})", urls.row_link(*index)),
    }
}
