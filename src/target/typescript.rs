//! TypeScript interfaces and type aliases.
//!
//! Properties are named after their wire names so that objects produced by
//! an XML-to-JSON bridge type-check without renaming. A complex base is
//! expressed with `extends`.

use std::fmt::Write;

use super::{DEFAULT_PACKAGE, GENERATED_NOTICE, Header, Renderer, TargetLanguage, doc_lines};
use crate::builtin::Builtin;
use crate::decl::{Declaration, Member, MemberKind, Shape, TypeName, TypeRef};
use crate::naming::{NameAllocator, is_js_identifier};

pub struct TypeScriptRenderer;

pub static TYPESCRIPT_RENDERER: TypeScriptRenderer = TypeScriptRenderer;

const UNTYPED: &str = "unknown";

fn type_name(name: &TypeName) -> &str {
    match name {
        TypeName::Builtin(builtin) => builtin.typescript(),
        TypeName::Named(name) => name,
        TypeName::Any => UNTYPED,
    }
}

fn type_ref(ty: &TypeRef) -> String {
    let inner = type_name(&ty.name);
    if ty.plural {
        format!("{inner}[]")
    } else {
        inner.to_string()
    }
}

fn property_name(name: &str) -> String {
    if is_js_identifier(name) {
        name.to_string()
    } else {
        format!("{name:?}")
    }
}

/// Property key, optionality marker and type for a non-base member.
fn property(member: &Member) -> (String, &'static str, String) {
    let ty = type_ref(&member.ty);
    match &member.kind {
        MemberKind::Element {
            wire_name,
            nillable,
        } => {
            if !*nillable {
                (wire_name.clone(), "", ty)
            } else if member.ty.plural {
                let item = type_name(&member.ty.name);
                (wire_name.clone(), "", format!("({item} | null)[]"))
            } else {
                (wire_name.clone(), "?", format!("{ty} | null"))
            }
        }
        MemberKind::Attribute {
            wire_name,
            optional,
        } => (wire_name.clone(), if *optional { "?" } else { "" }, ty),
        MemberKind::Value => ("value".to_string(), "", ty),
        MemberKind::Group
        | MemberKind::AttributeGroup
        | MemberKind::Base
        | MemberKind::UnionMember => (member.name.clone(), "", ty),
    }
}

fn render_doc(decl: &Declaration, out: &mut String) {
    writeln!(out, "/**").unwrap();
    for line in doc_lines(&decl.name, &decl.doc) {
        writeln!(out, " * {line}").unwrap();
    }
    if let Some(wire_name) = &decl.identity {
        writeln!(out, " * @xmlName {wire_name}").unwrap();
    }
    writeln!(out, " */").unwrap();
}

fn render_interface(decl: &Declaration, members: &[Member], out: &mut String) {
    let bases: Vec<&str> = members
        .iter()
        .filter(|m| m.kind == MemberKind::Base)
        .filter_map(|m| m.ty.named())
        .collect();
    let extends = if bases.is_empty() {
        String::new()
    } else {
        format!(" extends {}", bases.join(", "))
    };

    let properties: Vec<&Member> = members.iter().filter(|m| m.kind != MemberKind::Base).collect();
    if properties.is_empty() {
        writeln!(out, "export interface {}{extends} {{}}", decl.name).unwrap();
        return;
    }
    writeln!(out, "export interface {}{extends} {{", decl.name).unwrap();
    // Two members may share a wire name (element and attribute `id`, say).
    let mut keys = NameAllocator::new();
    for member in properties {
        let (key, optional, ty) = property(member);
        let key = property_name(&keys.allocate(&key));
        writeln!(out, "  {key}{optional}: {ty};").unwrap();
    }
    writeln!(out, "}}").unwrap();
}

impl Renderer for TypeScriptRenderer {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::TypeScript
    }

    fn extension(&self) -> &'static str {
        "ts"
    }

    fn builtin(&self, builtin: Builtin) -> &'static str {
        builtin.typescript()
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
        writeln!(out, "// Module: {package}").unwrap();
        out
    }

    fn render(&self, decl: &Declaration, out: &mut String) {
        writeln!(out).unwrap();
        render_doc(decl, out);
        let name = &decl.name;
        match &decl.shape {
            Shape::Alias(ty) => writeln!(out, "export type {name} = {};", type_ref(ty)).unwrap(),
            Shape::Any => writeln!(out, "export type {name} = {UNTYPED};").unwrap(),
            Shape::Struct(members) => render_interface(decl, members, out),
            Shape::Union(members) => {
                let alternatives: Vec<String> = members.iter().map(|m| type_ref(&m.ty)).collect();
                let body = if alternatives.is_empty() {
                    UNTYPED.to_string()
                } else {
                    alternatives.join(" | ")
                };
                writeln!(out, "export type {name} = {body};").unwrap();
            }
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
        TYPESCRIPT_RENDERER.render(decl, &mut out);
        out
    }

    fn element(wire: &str, nillable: bool) -> MemberKind {
        MemberKind::Element {
            wire_name: wire.to_string(),
            nillable,
        }
    }

    #[test]
    fn interface_with_base_and_optional_members() {
        let d = decl(
            "Child",
            Some("child"),
            Shape::Struct(vec![
                member(
                    "XmlLang",
                    TypeRef::single(TypeName::Builtin(Builtin::String)),
                    MemberKind::Attribute {
                        wire_name: "xml:lang".to_string(),
                        optional: true,
                    },
                ),
                member("LD", TypeRef::single(TypeName::Named("Logon".to_string())), element("LD", true)),
                member("Item", TypeRef::sequence(TypeName::Builtin(Builtin::Int64)), element("item", false)),
                member("MyType6", TypeRef::single(TypeName::Named("MyType6".to_string())), MemberKind::Base),
            ]),
        );
        assert_eq!(
            render(&d),
            "\n/**\n * Child ...\n * @xmlName child\n */\n\
             export interface Child extends MyType6 {\n\
             \x20 \"xml:lang\"?: string;\n\
             \x20 LD?: Logon | null;\n\
             \x20 item: number[];\n\
             }\n"
        );
    }

    #[test]
    fn plural_nillable_element_allows_null_items() {
        let d = decl(
            "Bag",
            None,
            Shape::Struct(vec![
                member("A", TypeRef::sequence(TypeName::Named("Item".to_string())), element("a", true)),
                member("B", TypeRef::sequence(TypeName::Named("Item".to_string())), element("b", false)),
            ]),
        );
        assert!(render(&d).contains("  a: (Item | null)[];\n  b: Item[];\n"));
    }

    #[test]
    fn value_member_and_shared_wire_names() {
        let d = decl(
            "Price",
            None,
            Shape::Struct(vec![
                member(
                    "Id",
                    TypeRef::single(TypeName::Builtin(Builtin::String)),
                    MemberKind::Attribute {
                        wire_name: "id".to_string(),
                        optional: false,
                    },
                ),
                member("Id2", TypeRef::single(TypeName::Builtin(Builtin::String)), element("id", false)),
                member("Value", TypeRef::single(TypeName::Builtin(Builtin::Decimal)), MemberKind::Value),
            ]),
        );
        let out = render(&d);
        assert!(out.contains("  id: string;\n  id2: string;\n  value: number;\n"));
    }

    #[test]
    fn union_and_aliases() {
        let union = decl(
            "Sizeorlabel",
            None,
            Shape::Union(vec![
                member("Label", TypeRef::single(TypeName::Builtin(Builtin::String)), MemberKind::UnionMember),
                member("XsInt", TypeRef::single(TypeName::Builtin(Builtin::Int32)), MemberKind::UnionMember),
            ]),
        );
        assert!(render(&union).ends_with("export type Sizeorlabel = string | number;\n"));

        let list = decl("Ids", None, Shape::Alias(TypeRef::sequence(TypeName::Builtin(Builtin::String))));
        assert!(render(&list).ends_with("export type Ids = string[];\n"));

        assert!(render(&decl("Empty", None, Shape::Any)).ends_with("export type Empty = unknown;\n"));
    }

    #[test]
    fn empty_interface_keeps_braces() {
        let d = decl("Marker", Some("marker"), Shape::Struct(vec![]));
        assert!(render(&d).ends_with("export interface Marker {}\n"));
    }

    #[test]
    fn preamble_names_module() {
        let out = TYPESCRIPT_RENDERER.preamble(&Header {
            package: "soap",
            source: Some("service.xsd"),
            usage: Usage::default(),
        });
        assert_eq!(
            out,
            "// Code generated by xsd-codegen. DO NOT EDIT.\n// Source: service.xsd\n// Module: soap\n"
        );
    }
}
