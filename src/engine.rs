use crate::errors::Result;
use crate::value::Value;
use crate::Engine;

// =========================
// Public API (Library funcs)
// =========================

/// Parses `json_str` and resolves `path` against it.
pub fn resolve_json(json_str: &str, path: &str) -> Result<Value> {
    Engine::default().resolve_json(json_str, path)
}

/// Coerces `text` into the built-in type called `type_name`, e.g. `"long"`
/// or `"local_date"`, using the UTC context.
pub fn coerce_named(text: Option<&str>, type_name: &str) -> Result<Value> {
    Engine::default().coerce_named(text, type_name)
}
