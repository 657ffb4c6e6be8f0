//! Identifier normalization for declaration, field and type names.
//!
//! Schema names may carry namespace prefixes (`xml:lang`), dots
//! (`order.v2`), dashes and underscores. Every segment between `:` and `.`
//! gets its first letter upper-cased, the segments are joined, and `-` and
//! `_` are dropped:
//!
//! - `"myType7"` → `"MyType7"`
//! - `"xml:lang"` → `"XmlLang"`
//! - `"purchase-order_line"` → `"Purchaseorderline"`

use std::collections::HashMap;

/// Strip a namespace prefix: `"xs:string"` → `"string"`.
pub fn trim_ns_prefix(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Upper-case the first character, leaving the rest untouched.
pub fn make_first_upper_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
    }
}

/// Normalize a raw schema name into an identifier.
///
/// Used for declaration names, member names and (non-builtin) type names.
/// May return an empty string for names made only of separators.
pub fn normalize_identifier(raw: &str) -> String {
    raw.split([':', '.'])
        .map(make_first_upper_case)
        .collect::<String>()
        .replace(['-', '_'], "")
}

/// Hands out identifiers, suffixing repeats with their occurrence count.
///
/// The first request for a name returns it unchanged, the second returns
/// `Name2`, the third `Name3`, and so on, in request order.
#[derive(Debug, Default)]
pub struct NameAllocator {
    counts: HashMap<String, usize>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name`, returning the identifier to use for it.
    pub fn allocate(&mut self, name: &str) -> String {
        let count = self.counts.entry(name.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            name.to_string()
        } else {
            format!("{name}{count}")
        }
    }

    /// Whether `name` was ever handed out in its bare form.
    pub fn is_taken(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }
}

/// Convert a PascalCase identifier to snake_case.
///
/// Acronym runs stay together: `"NTableID"` → `"n_table_id"`,
/// `"XMLName"` → `"xml_name"`.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield",
];

/// A snake_case Rust field identifier for a normalized member name.
///
/// Keywords become raw identifiers; the few that cannot be raw get a
/// trailing underscore.
pub fn rust_field_ident(name: &str) -> String {
    let snake = to_snake_case(name);
    match snake.as_str() {
        "" => "field".to_string(),
        "self" | "super" | "crate" | "_" => format!("{snake}_"),
        s if RUST_KEYWORDS.contains(&s) => format!("r#{s}"),
        _ => snake,
    }
}

/// Whether `s` can be used unquoted as a TypeScript property name.
pub fn is_js_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
