//! Names that are safe to splice into generated script.

use regex::Regex;
use std::sync::LazyLock;

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// ECMAScript reserved words, including strict-mode and literal names.
///
/// None of these may appear as a parameter or binding name in generated code.
const JS_RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "arguments",
    "eval",
];

/// Members of the script runtime object that exposed operations must not shadow.
const RUNTIME_MEMBERS: &[&str] = &[
    "on",
    "onReady",
    "getAllObjects",
    "getAllMethods",
    "getAllProperties",
    "callId",
    "pendingCalls",
    "eventListeners",
    "readyCallbacks",
    "isReady",
    "devMode",
    "appDevMode",
    "constructor",
];

/// Whether `name` is a plain script identifier usable as a binding name:
/// no dots, quotes, or spaces, and not a reserved word.
pub fn is_script_identifier(name: &str) -> bool {
    IDENT_RE.is_match(name) && !is_js_reserved_word(name)
}

/// Whether `name` is reserved by the language itself.
pub fn is_js_reserved_word(name: &str) -> bool {
    JS_RESERVED_WORDS.contains(&name)
}

/// Whether `name` collides with the runtime object's own members.
///
/// Every `_`-prefixed name is reserved for runtime internals.
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with('_') || RUNTIME_MEMBERS.contains(&name)
}
