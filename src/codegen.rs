//! Output assembly for a whole proto tree.
//!
//! Drives the emitters over every definition in tree order, inserts the
//! indirections recursive types need, and hands the declarations to the
//! selected target's renderer. The artifact is the preamble followed by
//! every declaration in emission order.
//!
//! The generated output is deterministic: identical input always produces
//! byte-identical output.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::decl::Declaration;
use crate::emit::{Context, emit_definition};
use crate::error::{Error, Result};
use crate::proto_tree::ProtoTree;
use crate::recursion::mark_indirections;
use crate::target::{DEFAULT_PACKAGE, Header, Renderer, TargetLanguage};

/// Statistics collected during generation for reporting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationStats {
    pub declarations_emitted: usize,
    pub duplicates_skipped: usize,
    pub self_typed_elements_skipped: usize,
    pub names_disambiguated: usize,
    pub unresolved_references: usize,
    pub indirections_inserted: usize,
}

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub target: TargetLanguage,
    /// Output base path; the target's extension is appended.
    pub output: PathBuf,
    /// Package or module name. Defaults to `schema`.
    pub package: Option<String>,
    /// Fail on references the tree does not define instead of passing them through.
    pub strict: bool,
}

impl GenerateConfig {
    pub fn new(target: TargetLanguage, output: impl Into<PathBuf>) -> Self {
        Self {
            target,
            output: output.into(),
            package: None,
            strict: false,
        }
    }

    pub fn package_name(&self) -> &str {
        self.package
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PACKAGE)
    }

    /// `<output>.<ext>`, unless the output already carries that extension.
    pub fn artifact_path(&self) -> PathBuf {
        let extension = self.target.renderer().extension();
        if self.output.extension().is_some_and(|e| e == extension) {
            return self.output.clone();
        }
        let mut path = self.output.clone().into_os_string();
        path.push(".");
        path.push(extension);
        PathBuf::from(path)
    }
}

/// A rendered artifact, not yet written.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub source: String,
    pub stats: GenerationStats,
}

/// Render the tree into source text without touching the filesystem.
pub fn render(tree: &ProtoTree, config: &GenerateConfig) -> Result<Artifact> {
    let mut ctx = Context::new(tree, config.strict);
    for (position, definition) in tree.definitions.iter().enumerate() {
        emit_definition(&mut ctx, position, definition)?;
    }
    let (mut decls, usage, mut stats) = ctx.finish();
    stats.indirections_inserted = mark_indirections(&mut decls);
    if stats.indirections_inserted > 0 {
        debug!(
            count = stats.indirections_inserted,
            "inserted indirections for recursive members"
        );
    }

    let header = Header {
        package: config.package_name(),
        source: tree.source.as_deref(),
        usage,
    };
    let source = assemble(config.target.renderer(), &header, &decls);
    Ok(Artifact {
        path: config.artifact_path(),
        source,
        stats,
    })
}

/// Preamble followed by every declaration, in order.
pub fn assemble(renderer: &dyn Renderer, header: &Header<'_>, decls: &[Declaration]) -> String {
    let mut out = renderer.preamble(header);
    for decl in decls {
        renderer.render(decl, &mut out);
    }
    out
}

/// Render the tree and write the artifact to `<output>.<ext>`.
///
/// Parent directories are created as needed.
pub fn generate(tree: &ProtoTree, config: &GenerateConfig) -> Result<GenerationStats> {
    let artifact = render(tree, config)?;
    write_file(&artifact.path, &artifact.source)?;
    info!(
        path = %artifact.path.display(),
        target = %config.target,
        declarations = artifact.stats.declarations_emitted,
        "wrote artifact"
    );
    Ok(artifact.stats)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_path_appends_extension() {
        let config = GenerateConfig::new(TargetLanguage::Go, "out/schema");
        assert_eq!(config.artifact_path(), PathBuf::from("out/schema.go"));

        let config = GenerateConfig::new(TargetLanguage::Rust, "out/schema.rs");
        assert_eq!(config.artifact_path(), PathBuf::from("out/schema.rs"));

        let config = GenerateConfig::new(TargetLanguage::TypeScript, "out/v1.2");
        assert_eq!(config.artifact_path(), PathBuf::from("out/v1.2.ts"));
    }

    #[test]
    fn package_name_defaults() {
        let mut config = GenerateConfig::new(TargetLanguage::Go, "x");
        assert_eq!(config.package_name(), "schema");
        config.package = Some(String::new());
        assert_eq!(config.package_name(), "schema");
        config.package = Some("soap".to_string());
        assert_eq!(config.package_name(), "soap");
    }

    #[test]
    fn empty_tree_is_preamble_only() {
        let config = GenerateConfig::new(TargetLanguage::Go, "x");
        let artifact = render(&ProtoTree::default(), &config).unwrap();
        assert_eq!(
            artifact.source,
            "// Code generated by xsd-codegen. DO NOT EDIT.\n\npackage schema\n"
        );
        assert_eq!(artifact.stats, GenerationStats::default());
    }
}
