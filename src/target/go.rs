//! Go structs with `encoding/xml` tags.
//!
//! ```text
//! // TopLevel ...
//! type TopLevel struct {
//! 	Cost	float64	`xml:"cost,attr,omitempty"`
//! 	Nested	*MyType7	`xml:"nested,omitempty"`
//! 	*MyType6
//! }
//! ```
//!
//! Alignment is left to `gofmt`.

use std::fmt::Write;

use super::{DEFAULT_PACKAGE, GENERATED_NOTICE, Header, Renderer, TargetLanguage, doc_lines};
use crate::builtin::Builtin;
use crate::decl::{Declaration, Member, MemberKind, Shape, TypeName, TypeRef};

pub struct GoRenderer;

pub static GO_RENDERER: GoRenderer = GoRenderer;

const UNTYPED: &str = "interface{}";

fn type_name(name: &TypeName) -> &str {
    match name {
        TypeName::Builtin(builtin) => builtin.go(),
        TypeName::Named(name) => name,
        TypeName::Any => UNTYPED,
    }
}

fn type_ref(ty: &TypeRef) -> String {
    let plural = if ty.plural { "[]" } else { "" };
    format!("{plural}{}", type_name(&ty.name))
}

fn member_type(member: &Member) -> String {
    let nillable = matches!(member.kind, MemberKind::Element { nillable: true, .. });
    let pointer = if nillable || (member.indirect && !member.ty.plural) {
        "*"
    } else {
        ""
    };
    let plural = if member.ty.plural { "[]" } else { "" };
    format!("{plural}{pointer}{}", type_name(&member.ty.name))
}

fn member_line(member: &Member) -> String {
    let name = &member.name;
    let ty = member_type(member);
    match &member.kind {
        MemberKind::Element {
            wire_name,
            nillable,
        } => {
            let omit = if *nillable { ",omitempty" } else { "" };
            format!("\t{name}\t{ty}\t`xml:\"{wire_name}{omit}\"`")
        }
        MemberKind::Attribute {
            wire_name,
            optional,
        } => {
            let omit = if *optional { ",omitempty" } else { "" };
            format!("\t{name}\t{ty}\t`xml:\"{wire_name},attr{omit}\"`")
        }
        MemberKind::Value => format!("\t{name}\t{ty}\t`xml:\",chardata\"`"),
        // Embedding promotes the base's fields into the derived struct.
        MemberKind::Base => format!("\t*{}", type_name(&member.ty.name)),
        MemberKind::Group | MemberKind::AttributeGroup | MemberKind::UnionMember => {
            format!("\t{name}\t{ty}")
        }
    }
}

impl Renderer for GoRenderer {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Go
    }

    fn extension(&self) -> &'static str {
        "go"
    }

    fn builtin(&self, builtin: Builtin) -> &'static str {
        builtin.go()
    }

    fn preamble(&self, header: &Header<'_>) -> String {
        let mut out = String::new();
        writeln!(out, "// {GENERATED_NOTICE}").unwrap();
        if let Some(source) = header.source {
            writeln!(out, "// Source: {source}").unwrap();
        }
        writeln!(out).unwrap();
        let package = if header.package.is_empty() {
            DEFAULT_PACKAGE
        } else {
            header.package
        };
        writeln!(out, "package {package}").unwrap();

        let mut imports = Vec::new();
        if header.usage.identity {
            imports.push("encoding/xml");
        }
        if header.usage.date_time {
            imports.push("time");
        }
        if !imports.is_empty() {
            writeln!(out).unwrap();
            writeln!(out, "import (").unwrap();
            for import in imports {
                writeln!(out, "\t\"{import}\"").unwrap();
            }
            writeln!(out, ")").unwrap();
        }
        out
    }

    fn render(&self, decl: &Declaration, out: &mut String) {
        writeln!(out).unwrap();
        for line in doc_lines(&decl.name, &decl.doc) {
            writeln!(out, "// {line}").unwrap();
        }
        let name = &decl.name;
        match &decl.shape {
            Shape::Alias(ty) => writeln!(out, "type {name} {}", type_ref(ty)).unwrap(),
            Shape::Any => writeln!(out, "type {name} {UNTYPED}").unwrap(),
            Shape::Struct(members) | Shape::Union(members) => {
                writeln!(out, "type {name} struct {{").unwrap();
                if let Some(wire_name) = &decl.identity {
                    writeln!(out, "\tXMLName\txml.Name\t`xml:\"{wire_name}\"`").unwrap();
                }
                for member in members {
                    writeln!(out, "{}", member_line(member)).unwrap();
                }
                writeln!(out, "}}").unwrap();
            }
        }
    }
}
