use crate::{
    expr::{Expr, LitKind, Prefix, Register},
    lexer::Lexer,
    line::{AssignOp, Comment, LabelDef, Line, Statement},
    mnemonic, Options, ParseError, Tok,
};

/// Parses a whole file into one [`Line`] per physical line.
///
/// The first line that does not match the grammar aborts the parse.
pub fn parse(source: &str, options: Options) -> Result<Vec<Line<'_>>, ParseError> {
    source
        .lines()
        .enumerate()
        .map(|(index, text)| Parser::new(Lexer::new(text, index + 1), options).line())
        .collect()
}

/// Parses a single line of text. `number` is only used for error reporting.
pub fn parse_line(text: &str, number: usize, options: Options) -> Result<Line<'_>, ParseError> {
    Parser::new(Lexer::new(text, number), options).line()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    options: Options,
}

impl<'a> Parser<'a> {
    fn new(lexer: Lexer<'a>, options: Options) -> Self {
        Self { lexer, options }
    }

    fn peek(&mut self) -> Result<Tok, ParseError> {
        self.lexer.peek()
    }

    fn eat(&mut self) {
        self.lexer.eat();
    }

    fn str(&self) -> &'a str {
        self.lexer.str()
    }

    fn err(&self, msg: &str) -> ParseError {
        self.lexer.err(msg)
    }

    fn unexpected(&mut self) -> ParseError {
        match self.peek() {
            Ok(Tok::EOL) => self.err("unexpected end of line"),
            Ok(_) => self.err(&format!("unexpected `{}`", self.str())),
            Err(e) => e,
        }
    }

    fn expect(&mut self, tok: Tok, msg: &str) -> Result<(), ParseError> {
        if self.peek()? != tok {
            return Err(self.err(msg));
        }
        self.eat();
        Ok(())
    }

    fn line(mut self) -> Result<Line<'a>, ParseError> {
        let mut line = Line::default();
        match self.peek()? {
            Tok::COLON => {
                self.eat();
                line.label = Some(LabelDef::anonymous());
            }
            Tok::ID => line.label = self.labeldef()?,
            _ => {}
        }
        line.statement = self.statement()?;
        if self.peek()? == Tok::SEMI {
            let indented = self.lexer.pos().column > 1;
            line.comment = Some(Comment {
                text: self.lexer.comment(),
                indented,
            });
        }
        if self.peek()? != Tok::EOL {
            return Err(self.unexpected());
        }
        Ok(line)
    }

    fn labeldef(&mut self) -> Result<Option<LabelDef<'a>>, ParseError> {
        let name = self.str();
        let mut ahead = self.lexer.clone();
        ahead.eat();
        let next = ahead.peek()?;
        if next == Tok::COLON {
            ahead.eat();
            self.lexer = ahead;
            return Ok(Some(LabelDef { name, colon: true }));
        }
        // legacy sources: a leading non-mnemonic followed by nothing or by
        // another statement is a label without its colon
        if self.options.colon_required || mnemonic::is_mnemonic(name) {
            return Ok(None);
        }
        if matches!(next, Tok::EOL | Tok::SEMI | Tok::ID | Tok::DIRECTIVE) {
            self.lexer = ahead;
            return Ok(Some(LabelDef { name, colon: false }));
        }
        Ok(None)
    }

    fn statement(&mut self) -> Result<Option<Statement<'a>>, ParseError> {
        match self.peek()? {
            Tok::EOL | Tok::SEMI => Ok(None),
            Tok::DIRECTIVE => self.directive().map(Some),
            Tok::ID => {
                let name = self.str();
                self.eat();
                let statement = match self.peek()? {
                    Tok::EQU => {
                        self.eat();
                        self.constant(name, AssignOp::Equ)?
                    }
                    Tok::ASSIGN => {
                        self.eat();
                        self.constant(name, AssignOp::Assign)?
                    }
                    _ => self.instruction(name)?,
                };
                Ok(Some(statement))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn constant(&mut self, name: &'a str, op: AssignOp) -> Result<Statement<'a>, ParseError> {
        let value = self.lexer.rest();
        if value.is_empty() {
            return Err(self.err("missing constant value"));
        }
        Ok(Statement::ConstantDef { name, op, value })
    }

    fn directive(&mut self) -> Result<Statement<'a>, ParseError> {
        let name = &self.str()[1..];
        self.eat();
        if name.eq_ignore_ascii_case("macro") || name.eq_ignore_ascii_case("mac") {
            return self.macro_start();
        }
        if name.eq_ignore_ascii_case("endmacro") || name.eq_ignore_ascii_case("endmac") {
            return Ok(Statement::MacroEnd);
        }
        let args = self.lexer.rest();
        Ok(Statement::Directive { name, args })
    }

    fn macro_start(&mut self) -> Result<Statement<'a>, ParseError> {
        if self.peek()? != Tok::ID {
            return Err(self.err("expected macro name"));
        }
        let name = self.str();
        self.eat();
        let mut params = Vec::new();
        loop {
            match self.peek()? {
                Tok::ID => {
                    params.push(self.str());
                    self.eat();
                }
                Tok::COMMA if !params.is_empty() => {
                    self.eat();
                    if self.peek()? != Tok::ID {
                        return Err(self.err("expected macro parameter"));
                    }
                }
                _ => break,
            }
        }
        Ok(Statement::MacroStart { name, params })
    }

    fn instruction(&mut self, mnemonic: &'a str) -> Result<Statement<'a>, ParseError> {
        let mut operands = Vec::new();
        if !matches!(self.peek()?, Tok::EOL | Tok::SEMI) {
            operands.push(self.operand()?);
            if self.peek()? == Tok::COMMA {
                self.eat();
                operands.push(self.operand()?);
                if self.peek()? == Tok::COMMA {
                    return Err(self.err("too many operands"));
                }
            }
        }
        Ok(Statement::Instruction { mnemonic, operands })
    }

    fn operand(&mut self) -> Result<Expr<'a>, ParseError> {
        match self.peek()? {
            Tok::HASH => {
                self.eat();
                let inner = self.byte_select()?;
                Ok(Expr::Prefixed {
                    prefix: Prefix::Immediate,
                    inner: Box::new(inner),
                })
            }
            Tok::ID => {
                // a register stands alone, otherwise it's just a label
                if let Some(register) = Register::from_name(self.str()) {
                    let mut ahead = self.lexer.clone();
                    ahead.eat();
                    if matches!(ahead.peek()?, Tok::COMMA | Tok::SEMI | Tok::EOL) {
                        self.lexer = ahead;
                        return Ok(Expr::Register(register));
                    }
                }
                self.expr()
            }
            _ => self.byte_select(),
        }
    }

    fn byte_select(&mut self) -> Result<Expr<'a>, ParseError> {
        let prefix = match self.peek()? {
            Tok::LT => Prefix::LowByte,
            Tok::GT => Prefix::HighByte,
            _ => return self.expr(),
        };
        self.eat();
        Ok(Expr::Prefixed {
            prefix,
            inner: Box::new(self.expr()?),
        })
    }

    fn expr(&mut self) -> Result<Expr<'a>, ParseError> {
        let left = self.primary()?;
        let op = self.peek()?;
        if !op.is_binary_op() {
            return Ok(left);
        }
        self.eat();
        let right = self.expr()?;
        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn primary(&mut self) -> Result<Expr<'a>, ParseError> {
        let kind = match self.peek()? {
            Tok::NUM => LitKind::Number,
            Tok::HEX => LitKind::Hex,
            Tok::BIN => LitKind::Binary,
            Tok::CHAR => LitKind::Char,
            Tok::STAR => LitKind::CurrentPc,
            Tok::ID => LitKind::LabelRef,
            Tok::REL | Tok::COLON => LitKind::RelativeRef,
            Tok::LPAREN => return self.group(),
            Tok::EOL | Tok::SEMI => return Err(self.err("expected expression")),
            _ => return Err(self.unexpected()),
        };
        let text = self.str();
        self.eat();
        Ok(Expr::lit(kind, text))
    }

    fn group(&mut self) -> Result<Expr<'a>, ParseError> {
        self.eat();
        let inner = Box::new(self.expr()?);
        match self.peek()? {
            Tok::RPAREN => {
                self.eat();
                Ok(Expr::Group(inner))
            }
            Tok::COMMA => {
                self.eat();
                let register = match self.peek()? {
                    Tok::ID => Register::from_name(self.str()),
                    _ => None,
                };
                let Some(register) = register else {
                    return Err(self.err("expected index register"));
                };
                self.eat();
                self.expect(Tok::RPAREN, "expected `)`")?;
                Ok(Expr::IndexedIndirect { inner, register })
            }
            _ => Err(self.err("expected `)`")),
        }
    }
}
