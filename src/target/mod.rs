//! Target-language renderers.
//!
//! A renderer turns target-independent [`Declaration`]s into source text
//! and writes the file preamble from the run's [`Usage`] flags. Emission
//! never depends on the target; only these modules do.

pub mod go;
pub mod rust;
pub mod typescript;

use std::fmt;
use std::str::FromStr;

use crate::builtin::Builtin;
use crate::decl::{Declaration, Usage};

/// First line of every generated artifact.
pub const GENERATED_NOTICE: &str = "Code generated by xsd-codegen. DO NOT EDIT.";

/// Package/module name used when the caller does not pick one.
pub const DEFAULT_PACKAGE: &str = "schema";

/// Languages the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Go,
    Rust,
    TypeScript,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 3] = [
        TargetLanguage::Go,
        TargetLanguage::Rust,
        TargetLanguage::TypeScript,
    ];

    pub fn renderer(self) -> &'static dyn Renderer {
        match self {
            TargetLanguage::Go => &go::GO_RENDERER,
            TargetLanguage::Rust => &rust::RUST_RENDERER,
            TargetLanguage::TypeScript => &typescript::TYPESCRIPT_RENDERER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TargetLanguage::Go => "go",
            TargetLanguage::Rust => "rust",
            TargetLanguage::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "go" | "golang" => Ok(TargetLanguage::Go),
            "rust" | "rs" => Ok(TargetLanguage::Rust),
            "typescript" | "ts" => Ok(TargetLanguage::TypeScript),
            other => Err(format!(
                "unknown target language '{other}' (expected one of: go, rust, typescript)"
            )),
        }
    }
}

/// What the preamble needs to know about a run.
#[derive(Debug, Clone, Copy)]
pub struct Header<'a> {
    /// Package or module name.
    pub package: &'a str,
    /// Schema file the proto tree came from.
    pub source: Option<&'a str>,
    pub usage: Usage,
}

/// A code generation target.
pub trait Renderer: Send + Sync {
    fn language(&self) -> TargetLanguage;

    /// File extension for the artifact, without the dot.
    fn extension(&self) -> &'static str;

    /// Spelling of a builtin in this language.
    fn builtin(&self, builtin: Builtin) -> &'static str;

    /// Header comment, module/package declaration and imports.
    fn preamble(&self, header: &Header<'_>) -> String;

    /// Append one declaration to `out`.
    fn render(&self, decl: &Declaration, out: &mut String);
}

/// Leading comment text for a declaration, one entry per line.
///
/// `"Name is <doc>"` when documented, `"Name ..."` otherwise. Tabs are
/// dropped and blank lines removed.
pub(crate) fn doc_lines(name: &str, doc: &str) -> Vec<String> {
    let doc = doc.replace('\t', "");
    let mut lines = doc.lines().map(str::trim).filter(|l| !l.is_empty());
    match lines.next() {
        None => vec![format!("{name} ...")],
        Some(first) => std::iter::once(format!("{name} is {first}"))
            .chain(lines.map(str::to_string))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_names() {
        assert_eq!("go".parse::<TargetLanguage>(), Ok(TargetLanguage::Go));
        assert_eq!("TS".parse::<TargetLanguage>(), Ok(TargetLanguage::TypeScript));
        assert_eq!("rust".parse::<TargetLanguage>(), Ok(TargetLanguage::Rust));
        assert!("cobol".parse::<TargetLanguage>().unwrap_err().contains("cobol"));
    }

    #[test]
    fn renderers_match_their_language() {
        for language in TargetLanguage::ALL {
            assert_eq!(language.renderer().language(), language);
            assert_eq!(language.to_string(), language.name());
        }
        assert_eq!(TargetLanguage::Go.renderer().extension(), "go");
        assert_eq!(TargetLanguage::Rust.renderer().extension(), "rs");
        assert_eq!(TargetLanguage::TypeScript.renderer().extension(), "ts");
        assert_eq!(TargetLanguage::Go.renderer().builtin(Builtin::DateTime), "time.Time");
        assert_eq!(TargetLanguage::Rust.renderer().builtin(Builtin::Integer), "i64");
        assert_eq!(TargetLanguage::TypeScript.renderer().builtin(Builtin::Bool), "boolean");
    }

    #[test]
    fn doc_lines_placeholder_and_multiline() {
        assert_eq!(doc_lines("MyType2", ""), ["MyType2 ..."]);
        assert_eq!(
            doc_lines("Logon", "Credentials for a session.\n\t\tSent with every call.\n"),
            ["Logon is Credentials for a session.", "Sent with every call."]
        );
    }
}
