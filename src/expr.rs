use std::fmt::{self, Display, Formatter};

use crate::Tok;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Number,
    Hex,
    Binary,
    Char,
    CurrentPc,
    LabelRef,
    RelativeRef,
}

/// Addressing prefix in front of an operand expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Immediate,
    LowByte,
    HighByte,
}

impl Prefix {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "#",
            Self::LowByte => "<",
            Self::HighByte => ">",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    A,
    X,
    Y,
}

impl Register {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "a" | "A" => Some(Self::A),
            "x" | "X" => Some(Self::X),
            "y" | "Y" => Some(Self::Y),
            _ => None,
        }
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
        }
    }
}

/// Operand expression tree. Leaves borrow their text from the source line.
///
/// Operator chains are kept in source order, nested to the right; nothing is
/// ever reassociated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr<'a> {
    Literal {
        kind: LitKind,
        text: &'a str,
    },
    Binary {
        op: Tok,
        left: Box<Expr<'a>>,
        right: Box<Expr<'a>>,
    },
    Group(Box<Expr<'a>>),
    Prefixed {
        prefix: Prefix,
        inner: Box<Expr<'a>>,
    },
    Register(Register),
    /// `(inner,X)`
    IndexedIndirect {
        inner: Box<Expr<'a>>,
        register: Register,
    },
}

impl<'a> Expr<'a> {
    pub fn lit(kind: LitKind, text: &'a str) -> Self {
        Self::Literal { kind, text }
    }
}

/// Rebuilds the operand text by concatenating the captured tokens.
///
/// Registers come out uppercase, everything else exactly as written.
pub fn flatten(expr: &Expr<'_>) -> String {
    let mut out = String::new();
    flatten_into(expr, &mut out);
    out
}

fn flatten_into(expr: &Expr<'_>, out: &mut String) {
    match expr {
        Expr::Literal { text, .. } => out.push_str(text),
        Expr::Binary { op, left, right } => {
            flatten_into(left, out);
            out.push(op.0 as char);
            flatten_into(right, out);
        }
        Expr::Group(inner) => {
            out.push('(');
            flatten_into(inner, out);
            out.push(')');
        }
        Expr::Prefixed { prefix, inner } => {
            out.push_str(prefix.as_str());
            flatten_into(inner, out);
        }
        Expr::Register(register) => out.push_str(&register.to_string()),
        Expr::IndexedIndirect { inner, register } => {
            out.push('(');
            flatten_into(inner, out);
            out.push(',');
            out.push_str(&register.to_string());
            out.push(')');
        }
    }
}
