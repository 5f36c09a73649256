//! Rich output for describers and its Markdown rendering.
//!
//! Describers never build hyperlinks themselves. They emit a [`RichOutput`]
//! made of blocks whose cells can *refer* to a column, a relationship, a value
//! or a row. Turning those references into links is delegated to a
//! [`UrlBuilder`] supplied by the presentation layer at render time, so a
//! cached describer renders correctly under any URL scheme.
//!
//! ```
//! use dfx::render::{Block, Inline, PrefixUrlBuilder, RichOutput, render_markdown};
//!
//! let rich = RichOutput::from(vec![Block::Paragraph(vec![
//!     Inline::text("Columns: "),
//!     Inline::Column("id".to_owned()),
//! ])]);
//! let md = render_markdown(&rich, &PrefixUrlBuilder::new("/data/people"));
//! assert_eq!(md, "Columns: [id](/data/people/column/id)\n");
//! ```

pub mod markdown;
pub mod urls;

pub use markdown::render_markdown;
pub use urls::{PrefixUrlBuilder, UrlBuilder};

use serde::{Deserialize, Serialize};

/// A piece of text, possibly referring to something linkable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inline {
    Text(String),
    Column(String),
    Relationship(String, String),
    Value { column: String, value: String },
    Row(usize),
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn value(column: impl Into<String>, value: impl ToString) -> Self {
        Self::Value {
            column: column.into(),
            value: value.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Heading(String),
    Paragraph(Vec<Inline>),
    /// Bulleted list, one line of inlines per item.
    List(Vec<Vec<Inline>>),
    Table {
        header: Vec<Inline>,
        rows: Vec<Vec<Inline>>,
        /// Column position to emphasize, if any.
        highlight: Option<usize>,
    },
    Preformatted(String),
}

/// Ordered blocks; empty means "nothing richer than the description".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichOutput {
    blocks: Vec<Block>,
}

impl RichOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl From<Vec<Block>> for RichOutput {
    fn from(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}
