//! Fixed lookup tables shared by the tokenizer and the error detector
//!
//! One cross-language keyword table (there is no per-language mode),
//! a built-in function table, and the operator sets. Built once on first use.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Keywords from several common languages, unioned. Stored lowercase;
/// lookups are case-insensitive.
const KEYWORDS: &[&str] = &[
    // Control flow
    "if", "else", "elif", "elsif", "elseif", "for", "foreach", "while", "do", "loop", "until",
    "unless", "switch", "case", "default", "break", "continue", "return", "goto", "try", "catch",
    "except", "finally", "throw", "throws", "raise", "yield", "await", "async", "match", "when",
    "then", "end", "begin", "pass", "in", "is", "with", "defer", "go", "select",
    // Declarations
    "var", "let", "const", "fn", "func", "function", "def", "lambda", "class", "struct", "enum",
    "union", "interface", "trait", "impl", "namespace", "module", "package", "import", "export",
    "from", "use", "using", "include", "require", "extern", "typedef", "type", "static", "mut",
    "pub", "crate", "mod", "where", "global", "nonlocal", "del", "dyn", "ref", "move", "unsafe",
    // Types
    "void", "int", "long", "short", "char", "float", "double", "bool", "boolean", "byte", "sbyte",
    "uint", "ulong", "ushort", "decimal", "string", "object", "dynamic", "auto", "signed",
    "unsigned", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
    "usize", "f32", "f64", "str", "any", "never", "unknown",
    // OOP and modifiers
    "new", "delete", "this", "self", "super", "base", "extends", "implements", "public",
    "private", "protected", "internal", "final", "abstract", "virtual", "override", "sealed",
    "readonly", "volatile", "synchronized", "transient", "native", "friend", "operator",
    "template", "typename", "instanceof", "typeof", "sizeof", "constexpr", "inline", "partial",
    "get", "set", "event", "delegate",
    // Literals
    "true", "false", "null", "nil", "none", "undefined",
    // Logical words
    "and", "or", "not", "as",
    // SQL
    "insert", "update", "into", "values", "create", "table", "drop", "alter", "index", "view",
    "join", "inner", "outer", "left", "right", "full", "cross", "on", "group", "by", "order",
    "having", "limit", "offset", "distinct", "between", "like", "exists", "primary", "key",
    "foreign", "references", "asc", "desc", "top", "database", "procedure", "trigger",
];

/// Well-known built-in functions, matched case-sensitively
const BUILTIN_FUNCTIONS: &[&str] = &[
    "print", "println", "printf", "sprintf", "fprintf", "puts", "echo", "len", "range",
    "enumerate", "zip", "map", "filter", "reduce", "sorted", "reversed", "sum", "min", "max",
    "abs", "round", "input", "open", "isinstance", "hasattr", "getattr", "setattr", "repr",
    "malloc", "calloc", "realloc", "free", "memcpy", "memset", "strlen", "strcpy", "strcmp",
    "parseInt", "parseFloat", "setTimeout", "setInterval", "clearTimeout", "alert", "eval",
    "panic", "assert", "count", "avg", "coalesce", "concat", "substring", "upper", "lower",
    "trim", "format", "append", "make", "cap", "copy",
];

/// Two-character operators, checked before single-character ones
const TWO_CHAR_OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", "<<", ">>", "=>",
    "->",
];

/// Statement starters that never need a trailing terminator
const NO_TERMINATOR_STARTERS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "try", "catch", "finally",
    "class", "struct", "enum", "interface", "namespace", "def", "function", "fn",
];

static KEYWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| KEYWORDS.iter().copied().collect());

static BUILTIN_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| BUILTIN_FUNCTIONS.iter().copied().collect());

static NO_TERMINATOR_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NO_TERMINATOR_STARTERS.iter().copied().collect());

/// Case-insensitive keyword lookup
pub fn is_keyword(word: &str) -> bool {
    if word.bytes().any(|b| b.is_ascii_uppercase()) {
        KEYWORD_SET.contains(word.to_ascii_lowercase().as_str())
    } else {
        KEYWORD_SET.contains(word)
    }
}

pub fn is_builtin_function(word: &str) -> bool {
    BUILTIN_SET.contains(word)
}

/// Characters that start an operator or punctuation token
pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-'
            | '*'
            | '/'
            | '%'
            | '='
            | '<'
            | '>'
            | '!'
            | '&'
            | '|'
            | '^'
            | '~'
            | '?'
            | ':'
            | ';'
            | ','
            | '.'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
    )
}

pub fn is_two_char_operator(first: char, second: char) -> bool {
    TWO_CHAR_OPERATORS.iter().any(|op| {
        let mut chars = op.chars();
        chars.next() == Some(first) && chars.next() == Some(second)
    })
}

/// Leading words after which a line is not expected to end with `;`
pub fn is_no_terminator_starter(word: &str) -> bool {
    NO_TERMINATOR_SET.contains(word)
}

/// Numeric literal suffix letters (`1.5f`, `10L`, `3u`)
pub fn is_number_suffix(c: char) -> bool {
    matches!(c, 'f' | 'F' | 'd' | 'D' | 'l' | 'L' | 'u' | 'U')
}
