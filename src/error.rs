use std::fmt::{self, Display, Formatter};

/// Failure to turn a token stream into an AST: an expected token was absent, no
/// alternative of an `or` matched, EOF arrived early, or the lexer itself choked
/// on the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ParseError at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// The taxonomy of evaluation failures from spec §7. Each carries the source
/// line of the offending node or token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalErrorKind {
    UndefinedName,
    TypeError,
    AssignTargetError,
    ArityError,
    BadOperator,
    DivideByZero,
}

impl Display for EvalErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            EvalErrorKind::UndefinedName => "UndefinedName",
            EvalErrorKind::TypeError => "TypeError",
            EvalErrorKind::AssignTargetError => "AssignTargetError",
            EvalErrorKind::ArityError => "ArityError",
            EvalErrorKind::BadOperator => "BadOperator",
            EvalErrorKind::DivideByZero => "DivideByZero",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub line: usize,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }

    pub fn undefined_name(line: usize, name: &str) -> Self {
        Self::new(
            EvalErrorKind::UndefinedName,
            line,
            format!("undefined name: {name}"),
        )
    }

    pub fn type_error(line: usize, message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::TypeError, line, message)
    }

    pub fn assign_target(line: usize) -> Self {
        Self::new(EvalErrorKind::AssignTargetError, line, "bad assignment")
    }

    pub fn arity(line: usize, expected: usize, got: usize) -> Self {
        Self::new(
            EvalErrorKind::ArityError,
            line,
            format!("bad number of arguments: expected {expected}, got {got}"),
        )
    }

    pub fn bad_operator(line: usize, op: &str) -> Self {
        Self::new(
            EvalErrorKind::BadOperator,
            line,
            format!("bad operator: {op}"),
        )
    }

    pub fn divide_by_zero(line: usize, op: &str) -> Self {
        Self::new(
            EvalErrorKind::DivideByZero,
            line,
            format!("divide by zero in '{op}'"),
        )
    }
}

impl Display for EvalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}: {}", self.kind, self.line, self.message)
    }
}

impl std::error::Error for EvalError {}

/// Either stage of the pipeline can fail; the driver reports both the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoneError {
    Parse(ParseError),
    Eval(EvalError),
}

impl From<ParseError> for StoneError {
    fn from(err: ParseError) -> Self {
        StoneError::Parse(err)
    }
}

impl From<EvalError> for StoneError {
    fn from(err: EvalError) -> Self {
        StoneError::Eval(err)
    }
}

impl Display for StoneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StoneError::Parse(err) => write!(f, "{err}"),
            StoneError::Eval(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for StoneError {}
