//! Coarse classification of field types and literal rendering helpers.

use std::fmt;

/// Canonical spelling of a null-terminated string as the parser resolves it.
pub const TEXT_TYPE_SPELLING: &str = "const char *";

/// Storage category of a field, as recorded in the class registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Null-terminated character sequence.
    Text,
    /// Any other pointer.
    Pointer,
    /// Scalars, aggregates and enums.
    Plain,
}

impl TypeCategory {
    /// Classify a fully-qualified type name.
    ///
    /// Rules apply in order: the exact text spelling, then a trailing `*`,
    /// then everything else. Arrays, references and smart pointers are not
    /// looked into.
    pub fn classify(type_name: &str) -> Self {
        if type_name == TEXT_TYPE_SPELLING {
            TypeCategory::Text
        } else if type_name.ends_with('*') {
            TypeCategory::Pointer
        } else {
            TypeCategory::Plain
        }
    }

    /// Enumerator spelling used in generated code.
    pub fn as_cpp(self) -> &'static str {
        match self {
            TypeCategory::Text => "Obs::TypeCategory::Text",
            TypeCategory::Pointer => "Obs::TypeCategory::Pointer",
            TypeCategory::Plain => "Obs::TypeCategory::Plain",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cpp())
    }
}

/// Escape text so it can sit between double quotes in C++ source.
pub fn escape_c_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Whether `value` is representable by `int64_t` or `uint64_t`.
pub fn value_in_range(value: i128) -> bool {
    (i128::from(i64::MIN)..=i128::from(u64::MAX)).contains(&value)
}

/// Render an enumerator value for a `uint64_t` registry slot.
///
/// Negative values are cast so their bit pattern survives; values that do
/// not fit `long long` get an unsigned suffix. `value` must satisfy
/// [`value_in_range`].
pub fn value_literal(value: i128) -> String {
    if value == i128::from(i64::MIN) {
        "static_cast<uint64_t>(INT64_MIN)".to_string()
    } else if value < 0 {
        format!("static_cast<uint64_t>({value}LL)")
    } else if value > i128::from(i64::MAX) {
        format!("{value}ULL")
    } else {
        value.to_string()
    }
}
