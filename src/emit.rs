//! Per-kind emitters: proto tree node → [`Declaration`].
//!
//! Each emitter claims its key in the memo store, resolves and normalizes
//! every reference it holds, and returns the finished declaration. None of
//! them render text; that is the target's job.

use tracing::{debug, warn};

use crate::codegen::GenerationStats;
use crate::decl::{DeclKind, Declaration, Member, MemberKind, Shape, TypeName, TypeRef, Usage};
use crate::error::{Error, Result};
use crate::memo::MemoStore;
use crate::naming::{NameAllocator, normalize_identifier, trim_ns_prefix};
use crate::proto_tree::{
    Attribute, AttributeGroup, ComplexType, Definition, Element, Group, GroupRef, ProtoTree,
    SimpleType,
};
use crate::resolve::{Resolved, Resolver};

/// Fallback for names that normalize to nothing.
const ANONYMOUS: &str = "Anonymous";

/// All mutable state of one generation run.
#[derive(Debug)]
pub struct Context<'a> {
    resolver: Resolver<'a>,
    names: NameAllocator,
    memo: MemoStore,
    usage: Usage,
    stats: GenerationStats,
    strict: bool,
}

impl<'a> Context<'a> {
    pub fn new(tree: &'a ProtoTree, strict: bool) -> Self {
        Self {
            resolver: Resolver::new(tree),
            names: NameAllocator::new(),
            memo: MemoStore::new(),
            usage: Usage::default(),
            stats: GenerationStats::default(),
            strict,
        }
    }

    /// Consume the context, yielding declarations in emission order.
    pub fn finish(self) -> (Vec<Declaration>, Usage, GenerationStats) {
        (self.memo.into_declarations(), self.usage, self.stats)
    }

    /// Allocate the run-unique declaration name for a raw schema name.
    fn declaration_name(&mut self, raw: &str) -> String {
        let mut normalized = normalize_identifier(raw);
        if normalized.is_empty() {
            normalized = ANONYMOUS.to_string();
        }
        let name = self.names.allocate(&normalized);
        if name != normalized {
            self.stats.names_disambiguated += 1;
            debug!(raw, declared_as = %name, "disambiguated colliding declaration name");
        }
        name
    }

    /// Resolve and normalize a referenced type.
    fn type_name(&mut self, raw: &str, referenced_by: &str) -> Result<TypeName> {
        match self.resolver.resolve(raw)? {
            Resolved::Builtin(builtin) => Ok(TypeName::Builtin(builtin)),
            Resolved::Named { name, known } => {
                let normalized = normalize_identifier(&name);
                if normalized.is_empty() {
                    return Ok(TypeName::Any);
                }
                if !known {
                    if self.strict {
                        return Err(Error::UnresolvedReference {
                            name,
                            referenced_by: referenced_by.to_string(),
                        });
                    }
                    self.stats.unresolved_references += 1;
                    warn!(
                        type_name = %name,
                        referenced_by,
                        "type is not defined in the proto tree, passing name through"
                    );
                }
                Ok(TypeName::Named(normalized))
            }
        }
    }

    fn type_ref(&mut self, raw: &str, plural: bool, referenced_by: &str) -> Result<TypeRef> {
        let name = self.type_name(raw, referenced_by)?;
        Ok(TypeRef { name, plural })
    }

    /// Claim `key`; counts and logs the skip when it was already taken.
    fn claim(&mut self, key: &str) -> bool {
        if self.memo.claim(key) {
            return true;
        }
        self.stats.duplicates_skipped += 1;
        debug!(key, "declaration already emitted, skipping");
        false
    }
}

/// Emit one proto tree entry into the context.
pub fn emit_definition(ctx: &mut Context<'_>, position: usize, definition: &Definition) -> Result<()> {
    let emitted = match definition {
        Definition::SimpleType(v) => simple_type(ctx, v)?,
        Definition::ComplexType(v) => complex_type(ctx, v)?,
        Definition::Group(v) => group(ctx, v)?,
        Definition::AttributeGroup(v) => attribute_group(ctx, v)?,
        Definition::Element(v) => element(ctx, v)?,
        Definition::Attribute(v) => attribute(ctx, v)?,
        Definition::Unsupported => return Err(Error::UnsupportedConstruct { position }),
    };
    if let Some(decl) = emitted {
        debug!(key = %decl.key, name = %decl.name, kind = ?decl.kind, "emitted declaration");
        ctx.usage = ctx.usage.merge(Usage::of(&decl));
        ctx.stats.declarations_emitted += 1;
        ctx.memo.record(decl);
    }
    Ok(())
}

/// Identity is kept only when normalization changed the name.
fn identity(name: &str, raw: &str) -> Option<String> {
    (name != raw).then(|| raw.to_string())
}

fn member_name(local: &mut NameAllocator, raw: &str) -> String {
    let normalized = normalize_identifier(raw);
    if normalized.is_empty() {
        local.allocate("Field")
    } else {
        local.allocate(&normalized)
    }
}

/// Struct shape, or the placeholder when there is nothing to hold.
fn struct_shape(members: Vec<Member>, identity: &Option<String>) -> Shape {
    if members.is_empty() && identity.is_none() {
        Shape::Any
    } else {
        Shape::Struct(members)
    }
}

pub fn simple_type(ctx: &mut Context<'_>, v: &SimpleType) -> Result<Option<Declaration>> {
    if !ctx.claim(&v.name) {
        return Ok(None);
    }
    let name = ctx.declaration_name(&v.name);

    if v.list {
        let item = ctx.type_ref(&v.base, true, &v.name)?;
        return Ok(Some(Declaration {
            key: v.name.clone(),
            name,
            kind: DeclKind::SimpleType,
            identity: None,
            doc: v.doc.clone(),
            shape: Shape::Alias(item),
        }));
    }

    if v.is_union() {
        let identity = identity(&name, &v.name);
        let mut local = NameAllocator::new();
        let mut members = Vec::with_capacity(v.member_types.len());
        for (member, member_type) in &v.member_types {
            // An untyped member names its own type.
            let raw_type = if member_type.is_empty() {
                member
            } else {
                member_type
            };
            let ty = ctx.type_ref(raw_type, false, &v.name)?;
            members.push(Member::new(
                member_name(&mut local, member),
                ty,
                MemberKind::UnionMember,
            ));
        }
        return Ok(Some(Declaration {
            key: v.name.clone(),
            name,
            kind: DeclKind::SimpleType,
            identity,
            doc: v.doc.clone(),
            shape: Shape::Union(members),
        }));
    }

    let base = ctx.type_ref(&v.base, false, &v.name)?;
    Ok(Some(Declaration {
        key: v.name.clone(),
        name,
        kind: DeclKind::SimpleType,
        identity: None,
        doc: v.doc.clone(),
        shape: Shape::Alias(base),
    }))
}

pub fn complex_type(ctx: &mut Context<'_>, v: &ComplexType) -> Result<Option<Declaration>> {
    if !ctx.claim(&v.name) {
        return Ok(None);
    }
    let name = ctx.declaration_name(&v.name);
    let identity = identity(&name, &v.name);
    let mut local = NameAllocator::new();
    let mut members = Vec::new();

    for group_ref in &v.attribute_groups {
        let ty = ctx.type_ref(&group_ref.reference, false, &v.name)?;
        members.push(Member::new(
            member_name(&mut local, &group_ref.name),
            ty,
            MemberKind::AttributeGroup,
        ));
    }
    for attr in &v.attributes {
        members.push(attribute_member(ctx, &mut local, attr, &v.name)?);
    }
    for group_ref in &v.groups {
        members.push(group_member(ctx, &mut local, group_ref, &v.name)?);
    }
    for elem in &v.elements {
        members.push(element_member(ctx, &mut local, elem, &v.name)?);
    }

    if let Some(base) = v.base.as_deref().filter(|b| !b.is_empty()) {
        let ty = ctx.type_name(base, &v.name)?;
        let simple_content =
            matches!(ty, TypeName::Builtin(_)) || ctx.resolver.is_simple_type(base);
        if simple_content {
            members.push(Member::new(
                local.allocate("Value"),
                TypeRef::single(ty),
                MemberKind::Value,
            ));
        } else {
            let member = match &ty {
                TypeName::Named(base_name) => local.allocate(base_name),
                _ => local.allocate("Base"),
            };
            members.push(Member::new(member, TypeRef::single(ty), MemberKind::Base));
        }
    }

    let shape = struct_shape(members, &identity);
    Ok(Some(Declaration {
        key: v.name.clone(),
        name,
        kind: DeclKind::ComplexType,
        identity,
        doc: v.doc.clone(),
        shape,
    }))
}

pub fn group(ctx: &mut Context<'_>, v: &Group) -> Result<Option<Declaration>> {
    if !ctx.claim(&v.name) {
        return Ok(None);
    }
    let name = ctx.declaration_name(&v.name);
    let identity = identity(&name, &v.name);
    let mut local = NameAllocator::new();
    let mut members = Vec::new();

    for elem in &v.elements {
        members.push(element_member(ctx, &mut local, elem, &v.name)?);
    }
    for group_ref in &v.groups {
        members.push(group_member(ctx, &mut local, group_ref, &v.name)?);
    }

    let shape = struct_shape(members, &identity);
    Ok(Some(Declaration {
        key: v.name.clone(),
        name,
        kind: DeclKind::Group,
        identity,
        doc: v.doc.clone(),
        shape,
    }))
}

pub fn attribute_group(ctx: &mut Context<'_>, v: &AttributeGroup) -> Result<Option<Declaration>> {
    if !ctx.claim(&v.name) {
        return Ok(None);
    }
    let name = ctx.declaration_name(&v.name);
    let identity = identity(&name, &v.name);
    let mut local = NameAllocator::new();
    let mut members = Vec::new();

    for attr in &v.attributes {
        members.push(attribute_member(ctx, &mut local, attr, &v.name)?);
    }

    let shape = struct_shape(members, &identity);
    Ok(Some(Declaration {
        key: v.name.clone(),
        name,
        kind: DeclKind::AttributeGroup,
        identity,
        doc: v.doc.clone(),
        shape,
    }))
}

/// A top-level element only needs its own declaration when it wraps a
/// differently named type.
///
/// A self-typed element is skipped without claiming its name, so the type
/// it names can still be emitted later.
pub fn element(ctx: &mut Context<'_>, v: &Element) -> Result<Option<Declaration>> {
    if v.name == trim_ns_prefix(&v.type_name) && !ctx.memo.contains(&v.name) {
        ctx.stats.self_typed_elements_skipped += 1;
        debug!(name = %v.name, "element is typed by its own name, skipping");
        return Ok(None);
    }
    if !ctx.claim(&v.name) {
        return Ok(None);
    }
    let name = ctx.declaration_name(&v.name);
    let ty = ctx.type_ref(&v.type_name, v.plural, &v.name)?;
    Ok(Some(Declaration {
        key: v.name.clone(),
        name,
        kind: DeclKind::Element,
        identity: None,
        doc: v.doc.clone(),
        shape: Shape::Alias(ty),
    }))
}

pub fn attribute(ctx: &mut Context<'_>, v: &Attribute) -> Result<Option<Declaration>> {
    if !ctx.claim(&v.name) {
        return Ok(None);
    }
    let name = ctx.declaration_name(&v.name);
    let ty = ctx.type_ref(&v.type_name, v.plural, &v.name)?;
    Ok(Some(Declaration {
        key: v.name.clone(),
        name,
        kind: DeclKind::Attribute,
        identity: None,
        doc: v.doc.clone(),
        shape: Shape::Alias(ty),
    }))
}

fn attribute_member(
    ctx: &mut Context<'_>,
    local: &mut NameAllocator,
    attr: &Attribute,
    owner: &str,
) -> Result<Member> {
    let ty = ctx.type_ref(&attr.type_name, attr.plural, owner)?;
    Ok(Member::new(
        member_name(local, &attr.name),
        ty,
        MemberKind::Attribute {
            wire_name: attr.name.clone(),
            optional: attr.optional,
        },
    ))
}

fn element_member(
    ctx: &mut Context<'_>,
    local: &mut NameAllocator,
    elem: &Element,
    owner: &str,
) -> Result<Member> {
    let ty = ctx.type_ref(&elem.type_name, elem.plural, owner)?;
    Ok(Member::new(
        member_name(local, &elem.name),
        ty,
        MemberKind::Element {
            wire_name: elem.name.clone(),
            nillable: elem.nillable,
        },
    ))
}

fn group_member(
    ctx: &mut Context<'_>,
    local: &mut NameAllocator,
    group_ref: &GroupRef,
    owner: &str,
) -> Result<Member> {
    let ty = ctx.type_ref(&group_ref.reference, group_ref.plural, owner)?;
    Ok(Member::new(
        member_name(local, &group_ref.name),
        ty,
        MemberKind::Group,
    ))
}
