//! Structured document model, independent of any output format

/// Inline content of a paragraph or table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    Emphasis(String),
    /// User-entered value; line breaks are kept
    Value(String),
    Checkbox(bool),
    Break,
    /// Horizontal gap between items on one line
    Gap,
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn strong(s: impl Into<String>) -> Self {
        Self::Strong(s.into())
    }

    pub fn emphasis(s: impl Into<String>) -> Self {
        Self::Emphasis(s.into())
    }

    pub fn value(s: impl Into<String>) -> Self {
        Self::Value(s.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub blocks: Vec<Block>,
    pub colspan: u16,
    pub header: bool,
    pub align: Align,
}

impl Cell {
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self::with_blocks(vec![Block::Inline(inlines)])
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            colspan: 1,
            header: false,
            align: Align::Left,
        }
    }

    pub fn header(label: &str) -> Self {
        Self {
            header: true,
            ..Self::new(vec![Inline::text(label)])
        }
    }

    pub fn span(mut self, colspan: u16) -> Self {
        self.colspan = colspan;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }
}

pub type Row = Vec<Cell>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub head: Option<Row>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { head: None, rows }
    }

    pub fn with_head(mut self, head: Row) -> Self {
        self.head = Some(head);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    SectionTitle(String),
    /// Italic instruction line under a section title
    Note(String),
    Paragraph(Vec<Inline>),
    /// Inline content without a paragraph wrapper (inside cells)
    Inline(Vec<Inline>),
    Table(Table),
}

impl Block {
    pub fn inlines(&self) -> Box<dyn Iterator<Item = &Inline> + '_> {
        match self {
            Block::Paragraph(inlines) | Block::Inline(inlines) => Box::new(inlines.iter()),
            Block::Table(table) => Box::new(
                table
                    .head
                    .iter()
                    .chain(table.rows.iter())
                    .flat_map(|row| row.iter())
                    .flat_map(|cell| cell.blocks.iter().flat_map(Block::inlines)),
            ),
            Block::Title(_) | Block::SectionTitle(_) | Block::Note(_) => {
                Box::new(std::iter::empty())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Every inline in the document, in reading order
    pub fn inlines(&self) -> impl Iterator<Item = &Inline> {
        self.blocks.iter().flat_map(Block::inlines)
    }

    /// Concatenated plain text of every inline
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for inline in self.inlines() {
            match inline {
                Inline::Text(s) | Inline::Strong(s) | Inline::Emphasis(s) | Inline::Value(s) => {
                    out.push_str(s)
                }
                Inline::Checkbox(true) => out.push('☑'),
                Inline::Checkbox(false) => out.push('☐'),
                Inline::Break => out.push('\n'),
                Inline::Gap => out.push(' '),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inlines_descend_into_nested_tables() {
        let inner = Table::new(vec![vec![Cell::new(vec![Inline::value("Level II")])]]);
        let mut doc = Document::new("Report");
        doc.push(Block::Table(Table::new(vec![vec![Cell::with_blocks(vec![
            Block::Inline(vec![Inline::strong("Accreditation")]),
            Block::Table(inner),
        ])]])));
        assert_eq!(doc.plain_text(), "AccreditationLevel II");
    }

    #[test]
    fn test_cell_builders() {
        let cell = Cell::header("Program").span(3).centered();
        assert!(cell.header);
        assert_eq!(cell.colspan, 3);
        assert_eq!(cell.align, Align::Center);
    }
}
