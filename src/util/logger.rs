use std::fmt::Debug;

use super::Log;

impl Log {
    fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default => 1,
            Log::Success => 2,
            Log::Result => 3,
            Log::Verbose => 4,
        }
    }

    /// Trace rule entry. No-op outside debug builds.
    #[allow(unused_variables)]
    pub fn trace_enter(&self, rule: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default.order() {
            println!("[{rule}] enter");
        }
    }

    /// Trace a successful match, with the matched children for context.
    #[allow(unused_variables)]
    pub fn trace_success<T: Debug>(&self, rule: &str, children: &[T]) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Success.order() {
            println!("[{rule}] matched {} node(s): {:?}", children.len(), children);
        }
    }

    /// Trace a failed match at the given line.
    #[allow(unused_variables)]
    pub fn trace_failure(&self, rule: &str, line: usize) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Verbose.order() {
            println!("[{rule}] failed at line {line}");
        }
    }
}
