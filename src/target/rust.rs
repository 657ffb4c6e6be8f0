//! Rust structs with serde attributes.
//!
//! Attribute and text naming follows the quick-xml serde conventions:
//! attributes are renamed `@name` and character data is `$text`.
//!
//! | Member | Field type | serde attribute |
//! |---|---|---|
//! | element | `T` | `rename = "wire"` |
//! | nillable element | `Option<T>` | `rename`, `default`, `skip_serializing_if` |
//! | plural member | `Vec<T>` | `rename`, `default` |
//! | plural nillable element | `Vec<Option<T>>` | `rename`, `default` |
//! | attribute | `T` / `Option<T>` | `rename = "@wire"` |
//! | group, attribute group, base | `T` | `flatten` |
//! | character data | `T` | `rename = "$text"` |
//!
//! Members marked indirect are boxed.

use std::fmt::Write;

use super::{DEFAULT_PACKAGE, GENERATED_NOTICE, Header, Renderer, TargetLanguage, doc_lines};
use crate::builtin::Builtin;
use crate::decl::{Declaration, Member, MemberKind, Shape, TypeName, TypeRef};
use crate::naming::{NameAllocator, rust_field_ident};

pub struct RustRenderer;

pub static RUST_RENDERER: RustRenderer = RustRenderer;

const DERIVES: &str = "#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]";

/// Stand-in for declarations with nothing to hold.
const UNTYPED: &str = "String";

fn type_name(name: &TypeName) -> &str {
    match name {
        TypeName::Builtin(builtin) => builtin.rust(),
        TypeName::Named(name) => name,
        TypeName::Any => UNTYPED,
    }
}

fn type_ref(ty: &TypeRef) -> String {
    let inner = type_name(&ty.name);
    if ty.plural {
        format!("Vec<{inner}>")
    } else {
        inner.to_string()
    }
}

/// Field type and serde attribute arguments for a struct member.
fn field(member: &Member) -> (String, Vec<String>) {
    let inner = type_name(&member.ty.name);
    let held = if member.indirect && !member.ty.plural {
        format!("Box<{inner}>")
    } else {
        inner.to_string()
    };

    let rename = match &member.kind {
        MemberKind::Element { wire_name, .. } => Some(wire_name.clone()),
        MemberKind::Attribute { wire_name, .. } => Some(format!("@{wire_name}")),
        MemberKind::Value => Some("$text".to_string()),
        _ => None,
    };
    let mut args: Vec<String> = rename
        .map(|wire| format!("rename = \"{wire}\""))
        .into_iter()
        .collect();

    if member.ty.plural {
        args.push("default".to_string());
        // Nil items keep their slot in the sequence.
        if matches!(member.kind, MemberKind::Element { nillable: true, .. }) {
            return (format!("Vec<Option<{held}>>"), args);
        }
        return (format!("Vec<{held}>"), args);
    }
    if member.is_optional() {
        args.push("default".to_string());
        args.push("skip_serializing_if = \"Option::is_none\"".to_string());
        return (format!("Option<{held}>"), args);
    }
    if matches!(
        member.kind,
        MemberKind::Group | MemberKind::AttributeGroup | MemberKind::Base
    ) {
        args.push("flatten".to_string());
    }
    (held, args)
}

fn render_struct(decl: &Declaration, members: &[Member], out: &mut String) {
    writeln!(out, "{DERIVES}").unwrap();
    if let Some(wire_name) = &decl.identity {
        writeln!(out, "#[serde(rename = \"{wire_name}\")]").unwrap();
    }
    if members.is_empty() {
        writeln!(out, "pub struct {} {{}}", decl.name).unwrap();
        return;
    }
    writeln!(out, "pub struct {} {{", decl.name).unwrap();
    let mut idents = NameAllocator::new();
    for member in members {
        let (ty, args) = field(member);
        if !args.is_empty() {
            writeln!(out, "    #[serde({})]", args.join(", ")).unwrap();
        }
        let ident = idents.allocate(&rust_field_ident(&member.name));
        writeln!(out, "    pub {ident}: {ty},").unwrap();
    }
    writeln!(out, "}}").unwrap();
}

/// Unions become untagged enums; the first alternative that parses wins.
fn render_union(decl: &Declaration, members: &[Member], out: &mut String) {
    writeln!(out, "{DERIVES}").unwrap();
    writeln!(out, "#[serde(untagged)]").unwrap();
    writeln!(out, "pub enum {} {{", decl.name).unwrap();
    for member in members {
        let inner = type_name(&member.ty.name);
        if member.indirect {
            writeln!(out, "    {}(Box<{inner}>),", member.name).unwrap();
        } else {
            writeln!(out, "    {}({inner}),", member.name).unwrap();
        }
    }
    writeln!(out, "}}").unwrap();
}

impl Renderer for RustRenderer {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Rust
    }

    fn extension(&self) -> &'static str {
        "rs"
    }

    fn builtin(&self, builtin: Builtin) -> &'static str {
        builtin.rust()
    }

    fn preamble(&self, header: &Header<'_>) -> String {
        let mut out = String::new();
        writeln!(out, "// {GENERATED_NOTICE}").unwrap();
        if let Some(source) = header.source {
            writeln!(out, "// Source: {source}").unwrap();
        }
        let package = if header.package.is_empty() {
            DEFAULT_PACKAGE
        } else {
            header.package
        };
        writeln!(out, "//! Data binding types for the `{package}` schema.").unwrap();

        let mut imports = Vec::new();
        if header.usage.date_time {
            imports.push("use chrono::{DateTime, Utc};");
        }
        if header.usage.structured {
            imports.push("use serde::{Deserialize, Serialize};");
        }
        if !imports.is_empty() {
            writeln!(out).unwrap();
            for import in imports {
                writeln!(out, "{import}").unwrap();
            }
        }
        out
    }

    fn render(&self, decl: &Declaration, out: &mut String) {
        writeln!(out).unwrap();
        for line in doc_lines(&decl.name, &decl.doc) {
            writeln!(out, "/// {line}").unwrap();
        }
        match &decl.shape {
            Shape::Alias(ty) => writeln!(out, "pub type {} = {};", decl.name, type_ref(ty)).unwrap(),
            Shape::Any => writeln!(out, "pub type {} = {UNTYPED};", decl.name).unwrap(),
            Shape::Struct(members) => render_struct(decl, members, out),
            Shape::Union(members) => render_union(decl, members, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{DeclKind, Usage};

    fn member(name: &str, ty: TypeRef, kind: MemberKind) -> Member {
        Member::new(name.to_string(), ty, kind)
    }

    fn named(name: &str) -> TypeName {
        TypeName::Named(name.to_string())
    }

    fn decl(name: &str, identity: Option<&str>, shape: Shape) -> Declaration {
        Declaration {
            key: name.to_string(),
            name: name.to_string(),
            kind: DeclKind::ComplexType,
            identity: identity.map(str::to_string),
            doc: String::new(),
            shape,
        }
    }

    fn render(decl: &Declaration) -> String {
        let mut out = String::new();
        RUST_RENDERER.render(decl, &mut out);
        out
    }

    #[test]
    fn struct_fields_carry_wire_names() {
        let d = decl(
            "AddRecord",
            None,
            Shape::Struct(vec![
                member(
                    "LD",
                    TypeRef::single(named("Logon")),
                    MemberKind::Element {
                        wire_name: "LD".to_string(),
                        nillable: true,
                    },
                ),
                member(
                    "NTableID",
                    TypeRef::single(TypeName::Builtin(Builtin::Int32)),
                    MemberKind::Element {
                        wire_name: "nTableID".to_string(),
                        nillable: false,
                    },
                ),
            ]),
        );
        assert_eq!(
            render(&d),
            "\n/// AddRecord ...\n\
             #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n\
             pub struct AddRecord {\n\
             \x20   #[serde(rename = \"LD\", default, skip_serializing_if = \"Option::is_none\")]\n\
             \x20   pub ld: Option<Logon>,\n\
             \x20   #[serde(rename = \"nTableID\")]\n\
             \x20   pub n_table_id: i32,\n\
             }\n"
        );
    }

    #[test]
    fn attributes_value_and_base() {
        let attr = member(
            "Cost",
            TypeRef::single(TypeName::Builtin(Builtin::Float64)),
            MemberKind::Attribute {
                wire_name: "cost".to_string(),
                optional: false,
            },
        );
        assert_eq!(field(&attr), ("f64".to_string(), vec!["rename = \"@cost\"".to_string()]));

        let value = member("Value", TypeRef::single(TypeName::Builtin(Builtin::String)), MemberKind::Value);
        assert_eq!(field(&value).1, ["rename = \"$text\""]);

        let base = member("MyType6", TypeRef::single(named("MyType6")), MemberKind::Base);
        assert_eq!(field(&base), ("MyType6".to_string(), vec!["flatten".to_string()]));

        let groups = member("Extra", TypeRef::sequence(named("ExtraGroup")), MemberKind::Group);
        assert_eq!(field(&groups), ("Vec<ExtraGroup>".to_string(), vec!["default".to_string()]));
    }

    #[test]
    fn plural_nillable_element_keeps_nil_items() {
        let element = |nillable| MemberKind::Element {
            wire_name: "item".to_string(),
            nillable,
        };
        let nillable = member("Item", TypeRef::sequence(named("Item")), element(true));
        let plain = member("Item", TypeRef::sequence(named("Item")), element(false));
        assert_eq!(
            field(&nillable),
            (
                "Vec<Option<Item>>".to_string(),
                vec!["rename = \"item\"".to_string(), "default".to_string()]
            )
        );
        assert_eq!(field(&plain).0, "Vec<Item>");
    }

    #[test]
    fn indirect_member_is_boxed() {
        let mut next = member(
            "Next",
            TypeRef::single(named("Node")),
            MemberKind::Element {
                wire_name: "next".to_string(),
                nillable: false,
            },
        );
        next.indirect = true;
        assert_eq!(field(&next).0, "Box<Node>");
    }

    #[test]
    fn identity_renames_container_and_keywords_are_escaped() {
        let d = decl(
            "MyType2",
            Some("myType2"),
            Shape::Struct(vec![
                member(
                    "Type",
                    TypeRef::single(TypeName::Builtin(Builtin::String)),
                    MemberKind::Attribute {
                        wire_name: "type".to_string(),
                        optional: false,
                    },
                ),
                member(
                    "Type2",
                    TypeRef::single(TypeName::Builtin(Builtin::String)),
                    MemberKind::Element {
                        wire_name: "type".to_string(),
                        nillable: false,
                    },
                ),
            ]),
        );
        let out = render(&d);
        assert!(out.contains("#[serde(rename = \"myType2\")]\npub struct MyType2 {\n"));
        assert!(out.contains("    pub r#type: String,\n"));
        assert!(out.contains("    pub type2: String,\n"));
    }

    #[test]
    fn union_is_untagged_enum() {
        let d = decl(
            "Sizeorlabel",
            Some("size-or-label"),
            Shape::Union(vec![
                member("Label", TypeRef::single(TypeName::Builtin(Builtin::String)), MemberKind::UnionMember),
                member("XsInt", TypeRef::single(TypeName::Builtin(Builtin::Int32)), MemberKind::UnionMember),
            ]),
        );
        let out = render(&d);
        assert!(out.contains("#[serde(untagged)]\npub enum Sizeorlabel {\n"));
        assert!(out.contains("    Label(String),\n    XsInt(i32),\n}\n"));
    }

    #[test]
    fn aliases_and_placeholder() {
        let list = decl(
            "Ids",
            None,
            Shape::Alias(TypeRef::sequence(TypeName::Builtin(Builtin::DateTime))),
        );
        assert_eq!(render(&list), "\n/// Ids ...\npub type Ids = Vec<DateTime<Utc>>;\n");
        assert_eq!(
            render(&decl("Empty", None, Shape::Any)),
            "\n/// Empty ...\npub type Empty = String;\n"
        );
    }

    #[test]
    fn preamble_imports_follow_usage() {
        let bare = RUST_RENDERER.preamble(&Header {
            package: "",
            source: None,
            usage: Usage::default(),
        });
        assert_eq!(
            bare,
            "// Code generated by xsd-codegen. DO NOT EDIT.\n\
             //! Data binding types for the `schema` schema.\n"
        );

        let full = RUST_RENDERER.preamble(&Header {
            package: "soap",
            source: Some("service.xsd"),
            usage: Usage {
                date_time: true,
                structured: true,
                ..Usage::default()
            },
        });
        assert!(full.ends_with(
            "\nuse chrono::{DateTime, Utc};\nuse serde::{Deserialize, Serialize};\n"
        ));
    }
}
