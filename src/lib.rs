use std::{
    error,
    fmt::{self, Display, Formatter},
    io,
};

pub mod config;
pub mod expr;
pub mod lexer;
pub mod line;
pub mod mnemonic;
pub mod parser;
pub mod render;
pub mod skip;
pub mod walk;

pub use expr::{flatten, Expr, LitKind, Prefix, Register};
pub use line::{AssignOp, Comment, LabelDef, Line, Statement};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tok(pub u8);

impl Tok {
    pub const SEMI: Self = Self(b';');
    pub const SOLIDUS: Self = Self(b'/');
    pub const STAR: Self = Self(b'*');
    pub const PLUS: Self = Self(b'+');
    pub const MINUS: Self = Self(b'-');
    pub const LT: Self = Self(b'<');
    pub const GT: Self = Self(b'>');
    pub const AMP: Self = Self(b'&');
    pub const CARET: Self = Self(b'^');
    pub const PIPE: Self = Self(b'|');
    pub const LPAREN: Self = Self(b'(');
    pub const RPAREN: Self = Self(b')');
    pub const HASH: Self = Self(b'#');
    pub const COMMA: Self = Self(b',');
    pub const COLON: Self = Self(b':');
    pub const EQU: Self = Self(b'=');

    pub const EOL: Self = Self(0x80);
    pub const ID: Self = Self(0x81);
    pub const NUM: Self = Self(0x82);
    pub const HEX: Self = Self(0x83);
    pub const BIN: Self = Self(0x84);
    pub const CHAR: Self = Self(0x85);
    pub const REL: Self = Self(0x86);
    pub const DIRECTIVE: Self = Self(0x87);
    pub const ASSIGN: Self = Self(0x88); // :=

    pub fn is_binary_op(self) -> bool {
        matches!(
            self,
            Self::PLUS
                | Self::MINUS
                | Self::STAR
                | Self::SOLIDUS
                | Self::PIPE
                | Self::CARET
                | Self::AMP
        )
    }
}

/// 1-based position within the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

/// Grammar switches for one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// When false, label definitions may omit the trailing `:` (legacy sources).
    pub colon_required: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            colon_required: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub excerpt: String,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: `{}`",
            self.line, self.column, self.message, self.excerpt
        )
    }
}

impl error::Error for ParseError {}

#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    /// A statement record the renderer has no layout for.
    UnknownStatement { line: usize, detail: String },
    Io(io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "parse error at {e}"),
            Self::UnknownStatement { line, detail } => {
                write!(f, "line {line}: cannot render statement: {detail}")
            }
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::UnknownStatement { .. } => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Formatted(String),
    /// The source opted out with `; nice65: ignore` and must stay untouched.
    Ignored,
}

pub fn format_source(source: &str, options: Options) -> Result<Outcome, Error> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    if skip::skip_requested(source.lines().next().unwrap_or_default()) {
        return Ok(Outcome::Ignored);
    }
    let lines = parser::parse(source, options)?;
    tracing::trace!("parsed {} lines", lines.len());
    let text = render::render(&lines)?;
    Ok(Outcome::Formatted(text))
}
