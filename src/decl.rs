//! Target-independent declaration model.
//!
//! Emitters turn proto tree nodes into [`Declaration`]s; renderers turn
//! declarations into source text. Nothing in here knows a target language.

use crate::builtin::Builtin;

/// The schema construct a declaration was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    SimpleType,
    ComplexType,
    Group,
    AttributeGroup,
    Element,
    Attribute,
}

/// A referenced type, before target rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Builtin(Builtin),
    /// Normalized name of a generated (or externally provided) declaration.
    Named(String),
    /// Untyped placeholder.
    Any,
}

/// A type reference with its cardinality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: TypeName,
    /// Sequence-typed (unbounded occurrence or `xs:list`).
    pub plural: bool,
}

impl TypeRef {
    pub fn single(name: TypeName) -> Self {
        Self {
            name,
            plural: false,
        }
    }

    pub fn sequence(name: TypeName) -> Self {
        Self { name, plural: true }
    }

    /// Name of the referenced generated declaration, if any.
    pub fn named(&self) -> Option<&str> {
        match &self.name {
            TypeName::Named(name) => Some(name),
            _ => None,
        }
    }
}

/// Role a member plays in the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    /// Child element serialized under `wire_name`.
    Element { wire_name: String, nillable: bool },
    /// XML attribute serialized as `wire_name`.
    Attribute { wire_name: String, optional: bool },
    /// Members of a referenced model group.
    Group,
    /// Attributes of a referenced attribute group.
    AttributeGroup,
    /// Character data of a simple-content complex type.
    Value,
    /// Promoted members of a complex base type.
    Base,
    /// One alternative of a union.
    UnionMember,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Normalized member name, unique within its declaration.
    pub name: String,
    pub ty: TypeRef,
    pub kind: MemberKind,
    /// Must be held through a pointer/box to keep the type finite.
    pub indirect: bool,
}

impl Member {
    pub fn new(name: String, ty: TypeRef, kind: MemberKind) -> Self {
        Self {
            name,
            ty,
            kind,
            indirect: false,
        }
    }

    /// Whether a serializer may omit this member.
    pub fn is_optional(&self) -> bool {
        matches!(
            self.kind,
            MemberKind::Element { nillable: true, .. } | MemberKind::Attribute { optional: true, .. }
        )
    }

    /// Whether the member holds its referent inline (not through a sequence).
    pub fn holds_by_value(&self) -> bool {
        !self.ty.plural
    }
}

/// Body of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// `type Name = T` (or `Vec<T>` when the reference is plural).
    Alias(TypeRef),
    Struct(Vec<Member>),
    Union(Vec<Member>),
    /// Nothing to hold: emitted as the untyped placeholder.
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Raw schema name; the memo store key.
    pub key: String,
    /// Normalized, run-unique declaration name.
    pub name: String,
    pub kind: DeclKind,
    /// Original wire name, present when `name` differs from it.
    pub identity: Option<String>,
    pub doc: String,
    pub shape: Shape,
}

impl Declaration {
    pub fn members(&self) -> &[Member] {
        match &self.shape {
            Shape::Struct(members) | Shape::Union(members) => members,
            Shape::Alias(_) | Shape::Any => &[],
        }
    }

    pub fn members_mut(&mut self) -> &mut [Member] {
        match &mut self.shape {
            Shape::Struct(members) | Shape::Union(members) => members,
            Shape::Alias(_) | Shape::Any => &mut [],
        }
    }
}

/// Preamble-relevant facts gathered while emitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    /// Some member or alias uses the date-time builtin.
    pub date_time: bool,
    /// Some declaration carries an identity (original wire name).
    pub identity: bool,
    /// Some struct or union was emitted.
    pub structured: bool,
}

impl Usage {
    /// Union of two flag sets.
    pub fn merge(self, other: Usage) -> Usage {
        Usage {
            date_time: self.date_time || other.date_time,
            identity: self.identity || other.identity,
            structured: self.structured || other.structured,
        }
    }

    /// Flags implied by one declaration.
    pub fn of(decl: &Declaration) -> Usage {
        let mut usage = Usage {
            identity: decl.identity.is_some(),
            structured: matches!(decl.shape, Shape::Struct(_) | Shape::Union(_)),
            ..Usage::default()
        };
        let mut note = |ty: &TypeRef| {
            if let TypeName::Builtin(b) = ty.name {
                usage.date_time |= b.is_date_time();
            }
        };
        match &decl.shape {
            Shape::Alias(ty) => note(ty),
            Shape::Struct(members) | Shape::Union(members) => {
                for member in members {
                    note(&member.ty);
                }
            }
            Shape::Any => {}
        }
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(shape: Shape) -> Declaration {
        Declaration {
            key: "k".to_string(),
            name: "K".to_string(),
            kind: DeclKind::ComplexType,
            identity: Some("k".to_string()),
            doc: String::new(),
            shape,
        }
    }

    #[test]
    fn usage_of_struct_with_date_time() {
        let d = decl(Shape::Struct(vec![Member::new(
            "At".to_string(),
            TypeRef::single(TypeName::Builtin(Builtin::DateTime)),
            MemberKind::Element {
                wire_name: "at".to_string(),
                nillable: false,
            },
        )]));
        let usage = Usage::of(&d);
        assert!(usage.date_time);
        assert!(usage.identity);
        assert!(usage.structured);
    }

    #[test]
    fn usage_of_placeholder() {
        let usage = Usage::of(&decl(Shape::Any));
        assert!(!usage.structured);
        assert!(!usage.date_time);
    }

    #[test]
    fn merge_is_union() {
        let a = Usage {
            date_time: true,
            ..Usage::default()
        };
        let b = Usage {
            identity: true,
            ..Usage::default()
        };
        let merged = a.merge(b);
        assert!(merged.date_time && merged.identity);
        assert!(!merged.structured);
    }

    #[test]
    fn optional_members() {
        let nillable = Member::new(
            "E".to_string(),
            TypeRef::single(TypeName::Named("T".to_string())),
            MemberKind::Element {
                wire_name: "e".to_string(),
                nillable: true,
            },
        );
        assert!(nillable.is_optional());
        assert!(nillable.holds_by_value());

        let plural = Member::new(
            "A".to_string(),
            TypeRef::sequence(TypeName::Builtin(Builtin::Int32)),
            MemberKind::Attribute {
                wire_name: "a".to_string(),
                optional: false,
            },
        );
        assert!(!plural.is_optional());
        assert!(!plural.holds_by_value());
    }
}
