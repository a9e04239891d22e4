//! Call-site resolution.
//!
//! The interceptor reports the first frame of user code above the profiling
//! machinery: the current thread's stack is walked outward and every frame
//! belonging to this crate, to the stack-capture machinery, to runtime glue, or
//! to a generated decorator is skipped. The filter list is the design element
//! here, not the capture API. When every frame is filtered out the literal
//! `"Unknown Caller"` is reported instead.

use std::fmt;

use backtrace::Backtrace;

/// Emitted when no user-code frame survives filtering.
pub const UNKNOWN_CALLER: &str = "Unknown Caller";

/// Frames whose symbol starts with one of these belong to the library, the
/// stack capture itself, or runtime glue.
const SKIP_PREFIXES: &[&str] = &[
    "callprof::",
    "backtrace::",
    "std::",
    "core::",
    "alloc::",
    "test::",
    "__rust",
    "rust_begin_unwind",
    "_start",
];

/// Function name segments that are never the caller: the stack-reading
/// primitive and the interceptor entry points.
const SKIP_METHODS: &[&str] = &["resolve_caller", "invoke", "invoke_fallible", "intercept"];

/// The first user-code frame outside the profiling library and its decorators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Demangled symbol of the calling function, e.g. `app::checkout::submit`.
    pub symbol: String,
    /// Source file name, when debug info is available.
    pub file: Option<String>,
    /// Source line, when debug info is available.
    pub line: Option<u32>,
}

impl CallSite {
    pub fn unknown() -> Self {
        Self {
            symbol: UNKNOWN_CALLER.to_string(),
            file: None,
            line: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.symbol == UNKNOWN_CALLER
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}({file}:{line})", self.symbol),
            _ => write!(f, "{}", self.symbol),
        }
    }
}

/// Walks the current stack and returns the first surviving frame.
///
/// `synthetic_fragment` carries the generated decorator's type name so its
/// forwarding frames are filtered out along with the library's own.
pub(crate) fn resolve_caller(synthetic_fragment: Option<&str>) -> CallSite {
    let backtrace = Backtrace::new();
    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            let Some(name) = symbol.name() else {
                continue;
            };
            let name = name.to_string();
            let name = trim_symbol_hash(&name);
            if should_skip(name, synthetic_fragment) {
                continue;
            }
            return CallSite {
                symbol: name.to_string(),
                file: symbol
                    .filename()
                    .and_then(|path| path.file_name())
                    .map(|file| file.to_string_lossy().into_owned()),
                line: symbol.lineno(),
            };
        }
    }
    CallSite::unknown()
}

fn should_skip(symbol: &str, synthetic_fragment: Option<&str>) -> bool {
    if SKIP_PREFIXES
        .iter()
        .any(|prefix| symbol.starts_with(prefix))
    {
        return true;
    }
    if let Some(fragment) = synthetic_fragment {
        if symbol.contains(fragment) {
            return true;
        }
    }
    let method = symbol.rsplit("::").next().unwrap_or(symbol);
    SKIP_METHODS.contains(&method)
}

/// Strips the trailing `::h0123456789abcdef` disambiguator rustc appends to
/// mangled symbols.
fn trim_symbol_hash(symbol: &str) -> &str {
    if let Some(idx) = symbol.rfind("::h") {
        let hash = &symbol[idx + 3..];
        if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return &symbol[..idx];
        }
    }
    symbol
}
