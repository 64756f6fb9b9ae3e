//! # Document Body Walk
//!
//! Streams `word/document.xml` and records:
//!
//! - **Body paragraphs**: `w:p` elements whose parent is `w:body`. Paragraphs
//!   inside tables, content controls, or text boxes are not body paragraphs.
//! - **Table cells**: `w:tc` elements of tables whose parent is `w:body`.
//!   A cell's text is its direct-child paragraphs joined with `\n`; nested
//!   tables contribute nothing.
//!
//! Paragraph text is the concatenation of its `w:t` runs, with `w:tab`
//! rendered as `\t` and `w:br`/`w:cr` as `\n`. Each record also keeps the
//! byte offset of its closing tag so annotations can be spliced in without
//! re-serializing the XML.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DocxError;

const BODY: &[u8] = b"w:body";
const PARAGRAPH: &[u8] = b"w:p";
const RUN: &[u8] = b"w:r";
const TEXT: &[u8] = b"w:t";
const TABLE: &[u8] = b"w:tbl";
const CELL: &[u8] = b"w:tc";

/// A top-level body paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    /// Offset of `</w:p>`. `None` for self-closing `<w:p/>`.
    pub(crate) insert_at: Option<usize>,
}

/// A cell of a top-level table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    /// Offset of `</w:tc>`.
    pub(crate) insert_at: Option<usize>,
}

/// Text-bearing structure of a document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentBody {
    pub paragraphs: Vec<Paragraph>,
    pub cells: Vec<TableCell>,
}

impl DocumentBody {
    /// Walk the main document part.
    pub fn parse(xml: &[u8]) -> Result<Self, DocxError> {
        let mut reader = Reader::from_reader(xml);
        let mut walk = Walk::default();

        loop {
            let event = reader.read_event().map_err(|e| DocxError::Xml {
                position: reader.error_position() as u64,
                message: e.to_string(),
            })?;

            match event {
                Event::Start(e) => walk.open(e.name().as_ref()),
                Event::Empty(e) => walk.empty(e.name().as_ref()),
                Event::End(e) => {
                    let end = reader.buffer_position() as usize;
                    walk.close(e.name().as_ref(), closing_tag_start(xml, end));
                }
                Event::Text(t) => {
                    if walk.collecting_text() {
                        let text = t.unescape().map_err(|e| DocxError::Xml {
                            position: reader.buffer_position() as u64,
                            message: e.to_string(),
                        })?;
                        walk.push_text(&text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(walk.body)
    }

    /// Body paragraph texts joined with `\n`.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Offset of the `</` that starts the end tag finishing at `end`.
fn closing_tag_start(xml: &[u8], end: usize) -> usize {
    xml[..end]
        .windows(2)
        .rposition(|w| w == b"</")
        .unwrap_or(end)
}

/// Walk state. `stack` holds the qualified names of open elements.
#[derive(Default)]
struct Walk {
    body: DocumentBody,
    stack: Vec<Vec<u8>>,
    paragraph_depth: usize,
    table_depth: usize,
    in_body_table: bool,
    /// Text of the paragraph being recorded, if the open paragraph is one.
    paragraph: Option<String>,
    /// Paragraph texts of the top-level table cell being recorded.
    cell: Option<Vec<String>>,
}

impl Walk {
    fn parent(&self) -> Option<&[u8]> {
        self.stack.last().map(Vec::as_slice)
    }

    /// Whether a `w:p` opening under the current parent is one we record.
    fn records_paragraph_here(&self) -> bool {
        match self.parent() {
            Some(BODY) => true,
            Some(CELL) => self.cell.is_some() && self.table_depth == 1,
            _ => false,
        }
    }

    fn open(&mut self, name: &[u8]) {
        match name {
            PARAGRAPH => {
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 && self.records_paragraph_here() {
                    self.paragraph = Some(String::new());
                }
            }
            TABLE => {
                self.table_depth += 1;
                if self.table_depth == 1 && self.parent() == Some(BODY) {
                    self.in_body_table = true;
                }
            }
            CELL => {
                if self.in_body_table && self.table_depth == 1 {
                    self.cell = Some(Vec::new());
                }
            }
            _ => {}
        }
        self.stack.push(name.to_vec());
    }

    fn empty(&mut self, name: &[u8]) {
        match name {
            PARAGRAPH if self.paragraph_depth == 0 => match self.parent() {
                Some(BODY) => self.body.paragraphs.push(Paragraph {
                    text: String::new(),
                    insert_at: None,
                }),
                Some(CELL) if self.table_depth == 1 => {
                    if let Some(cell) = self.cell.as_mut() {
                        cell.push(String::new());
                    }
                }
                _ => {}
            },
            b"w:tab" if self.in_recorded_run() => self.push_text("\t"),
            b"w:br" | b"w:cr" if self.in_recorded_run() => self.push_text("\n"),
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8], offset: usize) {
        self.stack.pop();
        match name {
            PARAGRAPH => {
                if self.paragraph_depth == 1 {
                    if let Some(text) = self.paragraph.take() {
                        match self.parent() {
                            Some(BODY) => self.body.paragraphs.push(Paragraph {
                                text,
                                insert_at: Some(offset),
                            }),
                            _ => {
                                if let Some(cell) = self.cell.as_mut() {
                                    cell.push(text);
                                }
                            }
                        }
                    }
                }
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
            }
            CELL => {
                if self.in_body_table && self.table_depth == 1 {
                    if let Some(paragraphs) = self.cell.take() {
                        self.body.cells.push(TableCell {
                            text: paragraphs.join("\n"),
                            insert_at: Some(offset),
                        });
                    }
                }
            }
            TABLE => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    self.in_body_table = false;
                }
            }
            _ => {}
        }
    }

    fn collecting_text(&self) -> bool {
        self.paragraph.is_some() && self.paragraph_depth == 1 && self.parent() == Some(TEXT)
    }

    fn in_recorded_run(&self) -> bool {
        self.paragraph.is_some() && self.paragraph_depth == 1 && self.parent() == Some(RUN)
    }

    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push_str(text);
        }
    }
}
