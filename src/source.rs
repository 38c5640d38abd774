//! Source registry: raw text of every compilation unit and the global
//! position space the graph and symbol tables share.
//!
//! Each unit owns the half-open byte range `[base, base + len]` of the
//! global space. Units added through [`SourceMap::add`] are laid out like a
//! Go file set: a unit starts one byte after the previous one ends, so no two
//! units ever share a position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `other` lies entirely inside this span.
    pub fn encloses(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Shift the span by `base` bytes.
    pub fn offset(&self, base: usize) -> Span {
        Span::new(self.start + base, self.end + base)
    }

    /// Shift the span back by `base` bytes, if it starts at or after it.
    pub fn local_to(&self, base: usize) -> Option<Span> {
        Some(Span::new(
            self.start.checked_sub(base)?,
            self.end.checked_sub(base)?,
        ))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// Index of a unit inside a [`SourceMap`].
pub type UnitId = usize;

/// One compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    base: usize,
    text: String,
}

impl SourceFile {
    /// A unit starting at global position 0.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_base(name, text, 0)
    }

    pub fn with_base(name: impl Into<String>, text: impl Into<String>, base: usize) -> Self {
        Self {
            name: name.into(),
            base,
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Global span of the whole unit.
    pub fn span(&self) -> Span {
        Span::new(self.base, self.base + self.text.len())
    }

    /// True for `base <= pos <= base + len`; the end position belongs to the
    /// unit so that end-of-file positions still resolve.
    pub fn contains_pos(&self, pos: usize) -> bool {
        self.base <= pos && pos <= self.base + self.text.len()
    }

    /// Text of a global span, if it lies inside this unit on char boundaries.
    pub fn slice(&self, span: Span) -> Option<&str> {
        let local = span.local_to(self.base)?;
        self.text.get(local.start..local.end)
    }

    /// 1-based line and column of a global position.
    pub fn line_col(&self, pos: usize) -> Option<(usize, usize)> {
        if !self.contains_pos(pos) {
            return None;
        }
        let local = pos - self.base;
        let before = self.text.get(..local)?;
        let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
        let col = match before.rfind('\n') {
            Some(nl) => local - nl,
            None => local + 1,
        };
        Some((line, col))
    }
}

/// Ordered collection of units sharing one position space.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit after the last one and return its id.
    pub fn add(&mut self, name: impl Into<String>, text: impl Into<String>) -> UnitId {
        let base = self.next_base();
        self.files.push(SourceFile::with_base(name, text, base));
        self.files.len() - 1
    }

    /// Append a unit with an externally chosen base.
    pub fn push(&mut self, file: SourceFile) -> UnitId {
        self.files.push(file);
        self.files.len() - 1
    }

    /// First free position after the registered units.
    pub fn next_base(&self) -> usize {
        self.files
            .iter()
            .map(|f| f.base + f.len() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, id: UnitId) -> Option<&SourceFile> {
        self.files.get(id)
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Unit owning a global position.
    pub fn file_for_pos(&self, pos: usize) -> Option<(UnitId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .find(|(_, f)| f.contains_pos(pos))
    }

    pub fn contains_pos(&self, pos: usize) -> bool {
        self.file_for_pos(pos).is_some()
    }

    /// Text of a global span, resolved through the owning unit.
    pub fn slice(&self, span: Span) -> Option<&str> {
        let (_, file) = self.file_for_pos(span.start)?;
        file.slice(span)
    }

    /// `(unit name, line, column)` of a global position.
    pub fn line_col(&self, pos: usize) -> Option<(&str, usize, usize)> {
        let (_, file) = self.file_for_pos(pos)?;
        let (line, col) = file.line_col(pos)?;
        Some((file.name(), line, col))
    }

    /// Global span covering every unit.
    pub fn span(&self) -> Span {
        let start = self.files.iter().map(|f| f.base).min().unwrap_or(0);
        let end = self.files.iter().map(|f| f.span().end).max().unwrap_or(start);
        Span::new(start, end)
    }

    /// All unit texts joined by a newline.
    pub fn joined(&self) -> String {
        self.files
            .iter()
            .map(SourceFile::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
