use crate::{
    expr,
    line::{Comment, LabelDef, Line, Statement},
    mnemonic, Error,
};

const LOCAL_LABEL_INDENT: usize = 4;
const STATEMENT_COLUMN: usize = 8;
const COMMENT_COLUMN: usize = 24;
const MACRO_KEYWORD_WIDTH: usize = 8;

/// Renders parsed lines in the canonical layout.
///
/// Each line is laid out on its own; a line may come out as several physical
/// lines when a long label pushes its statement down. Trailing whitespace is
/// stripped from every physical line and each one ends with `\n`.
pub fn render(lines: &[Line<'_>]) -> Result<String, Error> {
    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        let mut writer = LineWriter::default();
        writer
            .line(line)
            .map_err(|detail| Error::UnknownStatement {
                line: index + 1,
                detail,
            })?;
        for physical in writer.buf.split('\n') {
            out.push_str(physical.trim_end());
            out.push('\n');
        }
    }
    tracing::trace!("rendered {} lines into {} bytes", lines.len(), out.len());
    Ok(out)
}

#[derive(Default)]
struct LineWriter {
    buf: String,
}

impl LineWriter {
    /// Width of the physical line being written.
    fn column(&self) -> usize {
        let start = self.buf.rfind('\n').map_or(0, |i| i + 1);
        self.buf[start..].chars().count()
    }

    fn pad_to(&mut self, column: usize) {
        for _ in self.column()..column {
            self.buf.push(' ');
        }
    }

    fn newline(&mut self) {
        self.buf.push('\n');
    }

    fn line(&mut self, line: &Line<'_>) -> Result<(), String> {
        if line.label.is_none() && line.statement.is_none() {
            if let Some(comment) = &line.comment {
                if comment.indented {
                    self.pad_to(STATEMENT_COLUMN);
                }
                self.comment(comment);
            }
            return Ok(());
        }
        if let Some(label) = &line.label {
            self.label(label);
        }
        if let Some(statement) = &line.statement {
            self.statement(statement)?;
        }
        if let Some(comment) = &line.comment {
            self.pad_to(COMMENT_COLUMN);
            self.comment(comment);
        }
        Ok(())
    }

    fn label(&mut self, label: &LabelDef<'_>) {
        if label.is_local() {
            self.pad_to(LOCAL_LABEL_INDENT);
        }
        self.buf.push_str(label.name);
        self.buf.push(':');
    }

    fn comment(&mut self, comment: &Comment<'_>) {
        // an empty comment leaves a trailing space, stripped by `render`
        self.buf.push_str("; ");
        self.buf.push_str(comment.text);
    }

    fn statement(&mut self, statement: &Statement<'_>) -> Result<(), String> {
        if let Statement::Directive { name, args } = statement {
            if mnemonic::is_column_one(name) {
                if self.column() > 0 {
                    self.newline();
                }
                return self.directive(name, args);
            }
        }
        if self.column() >= STATEMENT_COLUMN {
            self.newline();
        }
        self.pad_to(STATEMENT_COLUMN);
        match statement {
            Statement::Instruction { mnemonic, operands } => {
                if mnemonic.is_empty() {
                    return Err("instruction without a mnemonic".to_string());
                }
                if operands.len() > 2 {
                    return Err(format!(
                        "`{mnemonic}` has {} operands, at most 2 are allowed",
                        operands.len()
                    ));
                }
                if mnemonic::is_mnemonic(mnemonic) {
                    self.buf.push_str(&mnemonic.to_ascii_uppercase());
                } else {
                    self.buf.push_str(mnemonic);
                }
                if !operands.is_empty() {
                    let operands: Vec<String> = operands.iter().map(expr::flatten).collect();
                    self.buf.push(' ');
                    self.buf.push_str(&operands.join(", "));
                }
            }
            Statement::Directive { name, args } => self.directive(name, args)?,
            Statement::MacroStart { name, params } => {
                if name.is_empty() {
                    return Err("macro without a name".to_string());
                }
                self.buf.push_str(&format!(
                    "{:<width$}",
                    ".macro",
                    width = MACRO_KEYWORD_WIDTH
                ));
                self.buf.push_str(name);
                self.buf.push(' ');
                self.buf.push_str(&params.join(", "));
            }
            Statement::MacroEnd => self.buf.push_str(".endmacro"),
            Statement::ConstantDef { name, op, value } => {
                let (name, value) = (name.trim(), value.trim());
                if name.is_empty() || value.is_empty() {
                    return Err("incomplete constant definition".to_string());
                }
                self.buf.push_str(name);
                self.buf.push(' ');
                self.buf.push_str(op.as_str());
                self.buf.push(' ');
                self.buf.push_str(value);
            }
        }
        Ok(())
    }

    fn directive(&mut self, name: &str, args: &str) -> Result<(), String> {
        if name.is_empty() {
            return Err("directive without a name".to_string());
        }
        self.buf.push('.');
        self.buf.push_str(&name.to_ascii_lowercase());
        if !args.is_empty() {
            self.buf.push(' ');
            self.buf.push_str(args);
        }
        Ok(())
    }
}
