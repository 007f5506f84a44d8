mod code;
mod logger;
mod position;
use once_cell::unsync::OnceCell;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// Line/column location, resolved lazily from a byte offset into source text.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Source text wrapper which can resolve a byte offset to a [Position] on demand.
pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
/// Debug verbosity level for grammar/evaluator tracing. Checked only in debug builds.
pub enum Log {
    None,
    Default,
    Success,
    Result,
    Verbose,
}

impl Default for Log {
    fn default() -> Self {
        Log::None
    }
}
