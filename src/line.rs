use crate::expr::Expr;

/// One physical source line: `[label] [statement] [; comment]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line<'a> {
    pub label: Option<LabelDef<'a>>,
    pub statement: Option<Statement<'a>>,
    pub comment: Option<Comment<'a>>,
}

impl<'a> Line<'a> {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.statement.is_none() && self.comment.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelDef<'a> {
    /// Empty for the bare anonymous marker `:`.
    pub name: &'a str,
    pub colon: bool,
}

impl<'a> LabelDef<'a> {
    pub fn anonymous() -> Self {
        Self {
            name: "",
            colon: true,
        }
    }

    /// Anonymous and `@`-scoped labels are indented.
    pub fn is_local(&self) -> bool {
        self.name.is_empty() || self.name.starts_with('@')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Equ,
    /// `:=`
    Assign,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equ => "=",
            Self::Assign => ":=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    /// A mnemonic, or a macro invocation in the mnemonic slot.
    Instruction {
        mnemonic: &'a str,
        operands: Vec<Expr<'a>>,
    },
    /// `.name args`, `args` kept verbatim. `name` excludes the dot.
    Directive { name: &'a str, args: &'a str },
    MacroStart {
        name: &'a str,
        params: Vec<&'a str>,
    },
    MacroEnd,
    ConstantDef {
        name: &'a str,
        op: AssignOp,
        value: &'a str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment<'a> {
    pub text: &'a str,
    /// The `;` was not in the first column. Only consulted for comment-only
    /// lines.
    pub indented: bool,
}
