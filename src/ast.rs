use std::fmt;
use std::ops::Range;

use lts::Act;

/// Character-offset span into the source text, as produced by the parser.
pub type Span = Range<usize>;

/// A resolved source position, with 1-based line and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    /// Resolves a character offset (the parser's span unit) to line and
    /// column.
    pub fn resolve(source: &str, offset: usize) -> Location {
        let mut line = 1;
        let mut column = 1;
        let mut resolved = 0;
        for c in source.chars().take(offset) {
            resolved += 1;
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Location { line, column, offset: resolved }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: Location,
    pub end: Location,
}

impl SourceSpan {
    pub fn resolve(source: &str, span: &Span) -> SourceSpan {
        SourceSpan {
            start: Location::resolve(source, span.start),
            end: Location::resolve(source, span.end),
        }
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.start, f)
    }
}

/// One source file is a sequence of models, each closed by a `.`.
#[derive(Debug)]
pub struct Model {
    pub definitions: Vec<Definition>,
    pub hide: Option<HideSet>,
    pub span: Span,
}

#[derive(Debug)]
pub struct Definition {
    pub name: String,
    pub body: Process,
    pub span: Span,
}

/// Model-level `\{a, b}` set: the named actions become τ in every
/// definition of the model.
#[derive(Debug)]
pub struct HideSet {
    pub actions: Vec<Act>,
    pub span: Span,
}

#[derive(Debug)]
pub struct Process {
    pub kind: ProcessKind,
    pub span: Span,
}

#[derive(Debug)]
pub enum ProcessKind {
    /// `act -> continuation`
    Sequence(Act, Box<Process>),
    /// `p | q`
    Choice(Box<Process>, Box<Process>),
    /// `p || q`
    Parallel(Box<Process>, Box<Process>),
    /// Reference to another definition.
    Name(String),
    Stop,
    Error,
}
