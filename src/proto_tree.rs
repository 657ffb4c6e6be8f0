//! Proto tree types, loading, and downloading.
//!
//! The proto tree is the intermediate representation an external XSD parser
//! hands to the generator: an ordered list of top-level schema definitions.
//! Every `type`, `base` and `ref` field is a *name* reference. Nothing is
//! linked eagerly, so the tree may describe cyclic type graphs freely.
//!
//! On disk the tree is JSON with camelCase keys and a `kind` tag per entry:
//!
//! ```json
//! {
//!   "source": "base64.xsd",
//!   "definitions": [
//!     { "kind": "simpleType", "name": "myType1", "base": "xs:base64Binary" },
//!     { "kind": "complexType", "name": "myType7", "base": "xs:string",
//!       "attributes": [{ "name": "origin", "type": "xs:string" }] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A parsed schema: top-level definitions in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtoTree {
    /// Schema file the tree was parsed from, echoed into the output header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Top-level definitions. Order decides output order and which of two
    /// same-named definitions wins during resolution (the first).
    pub definitions: Vec<Definition>,
}

/// One top-level schema construct.
///
/// Unknown `kind` tags deserialize to [`Definition::Unsupported`] so the
/// engine can reject them with a positioned error instead of failing the
/// whole parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Definition {
    SimpleType(SimpleType),
    ComplexType(ComplexType),
    Group(Group),
    AttributeGroup(AttributeGroup),
    Element(Element),
    Attribute(Attribute),
    #[serde(other)]
    Unsupported,
}

impl Definition {
    /// Raw schema name of the definition, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Definition::SimpleType(v) => Some(&v.name),
            Definition::ComplexType(v) => Some(&v.name),
            Definition::Group(v) => Some(&v.name),
            Definition::AttributeGroup(v) => Some(&v.name),
            Definition::Element(v) => Some(&v.name),
            Definition::Attribute(v) => Some(&v.name),
            Definition::Unsupported => None,
        }
    }
}

/// `xs:simpleType`: a plain alias, a list, or a union.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleType {
    pub name: String,

    /// Restriction base or list item type (builtin or another simple type).
    #[serde(default)]
    pub base: String,

    /// `xs:list`: a whitespace-separated sequence of `base` values.
    #[serde(default)]
    pub list: bool,

    /// `xs:union` over `member_types`.
    #[serde(default)]
    pub union: bool,

    /// Union members keyed by member name. An empty type means the member
    /// name itself is the type to resolve.
    #[serde(default)]
    pub member_types: BTreeMap<String, String>,

    #[serde(default)]
    pub doc: String,
}

impl SimpleType {
    /// A union only takes the union shape when it has members.
    pub fn is_union(&self) -> bool {
        self.union && !self.member_types.is_empty()
    }

    /// Neither a list nor a populated union.
    pub fn is_plain_alias(&self) -> bool {
        !self.list && !self.is_union()
    }
}

/// `xs:complexType`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexType {
    pub name: String,

    /// Extension or restriction parent.
    #[serde(default)]
    pub base: Option<String>,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(default)]
    pub attribute_groups: Vec<AttributeGroupRef>,

    #[serde(default)]
    pub elements: Vec<Element>,

    #[serde(default)]
    pub groups: Vec<GroupRef>,

    #[serde(default)]
    pub doc: String,
}

/// `xs:element`, top-level or nested in a content model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub name: String,

    #[serde(rename = "type", default)]
    pub type_name: String,

    /// `maxOccurs="unbounded"` (or greater than one).
    #[serde(default)]
    pub plural: bool,

    #[serde(default)]
    pub nillable: bool,

    #[serde(default)]
    pub doc: String,
}

/// `xs:attribute`, top-level or nested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,

    #[serde(rename = "type", default)]
    pub type_name: String,

    #[serde(default)]
    pub plural: bool,

    /// `use="optional"`.
    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub doc: String,
}

/// `xs:group` definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,

    #[serde(default)]
    pub elements: Vec<Element>,

    #[serde(default)]
    pub groups: Vec<GroupRef>,

    #[serde(default)]
    pub doc: String,
}

/// `xs:attributeGroup` definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeGroup {
    pub name: String,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(default)]
    pub doc: String,
}

/// `<xs:group ref="..."/>` inside a content model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRef {
    pub name: String,

    #[serde(rename = "ref")]
    pub reference: String,

    #[serde(default)]
    pub plural: bool,
}

/// `<xs:attributeGroup ref="..."/>` inside a complex type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeGroupRef {
    pub name: String,

    #[serde(rename = "ref")]
    pub reference: String,
}

/// Load a serialized proto tree from disk.
pub fn load_tree(path: &Path) -> Result<ProtoTree> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_tree(&content)
}

/// Parse a proto tree from its JSON form.
pub fn parse_tree(content: &str) -> Result<ProtoTree> {
    let tree: ProtoTree = serde_json::from_str(content)?;
    if let Some(position) = tree
        .definitions
        .iter()
        .position(|d| d.name().is_some_and(str::is_empty))
    {
        return Err(Error::Tree(format!(
            "definition at position {position} has an empty name"
        )));
    }
    Ok(tree)
}

/// Download a serialized proto tree and save it to disk.
///
/// The response is validated as a proto tree before anything is written.
#[cfg(feature = "download")]
pub async fn download_tree(url: &str, output_path: &Path) -> Result<()> {
    tracing::info!(%url, "downloading proto tree");

    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Download(format!(
            "GET {url} returned {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::Download(format!("reading response body: {e}")))?;

    // Validate before writing.
    let tree = parse_tree(&body)
        .map_err(|e| Error::Tree(format!("downloaded content is not a valid proto tree: {e}")))?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(output_path, &body).map_err(|e| Error::Write {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        definitions = tree.definitions.len(),
        path = %output_path.display(),
        "saved proto tree"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree_json() -> &'static str {
        r#"{
            "source": "base64.xsd",
            "definitions": [
                { "kind": "simpleType", "name": "myType1", "base": "xs:base64Binary" },
                {
                    "kind": "simpleType",
                    "name": "sizes",
                    "union": true,
                    "memberTypes": { "small": "xs:int", "label": "" }
                },
                {
                    "kind": "complexType",
                    "name": "myType7",
                    "base": "xs:string",
                    "attributes": [
                        { "name": "origin", "type": "xs:string" },
                        { "name": "length", "type": "xs:int", "optional": true }
                    ]
                },
                {
                    "kind": "complexType",
                    "name": "TopLevel",
                    "elements": [
                        { "name": "nested", "type": "myType7", "nillable": true },
                        { "name": "myType1", "type": "myType1", "plural": true }
                    ],
                    "groups": [{ "name": "extra", "ref": "tns:extraGroup", "plural": true }],
                    "attributeGroups": [{ "name": "common", "ref": "commonAttrs" }]
                },
                { "kind": "element", "name": "top", "type": "TopLevel" }
            ]
        }"#
    }

    #[test]
    fn parse_sample_tree() {
        let tree = parse_tree(sample_tree_json()).unwrap();
        assert_eq!(tree.source.as_deref(), Some("base64.xsd"));
        assert_eq!(tree.definitions.len(), 5);
        assert_eq!(tree.definitions[4].name(), Some("top"));
    }

    #[test]
    fn parse_complex_type_members() {
        let tree = parse_tree(sample_tree_json()).unwrap();
        let Definition::ComplexType(top) = &tree.definitions[3] else {
            panic!("expected complex type");
        };
        assert!(top.base.is_none());
        assert!(top.elements[0].nillable);
        assert!(top.elements[1].plural);
        assert_eq!(top.groups[0].reference, "tns:extraGroup");
        assert!(top.groups[0].plural);
        assert_eq!(top.attribute_groups[0].reference, "commonAttrs");

        let Definition::ComplexType(seven) = &tree.definitions[2] else {
            panic!("expected complex type");
        };
        assert_eq!(seven.base.as_deref(), Some("xs:string"));
        assert!(!seven.attributes[0].optional);
        assert!(seven.attributes[1].optional);
    }

    #[test]
    fn union_shape_requires_members() {
        let tree = parse_tree(sample_tree_json()).unwrap();
        let Definition::SimpleType(sizes) = &tree.definitions[1] else {
            panic!("expected simple type");
        };
        assert!(sizes.is_union());
        assert!(!sizes.is_plain_alias());
        assert_eq!(sizes.member_types["label"], "");

        let empty_union = SimpleType {
            name: "u".to_string(),
            base: "xs:string".to_string(),
            union: true,
            ..Default::default()
        };
        assert!(!empty_union.is_union());
        assert!(empty_union.is_plain_alias());
    }

    #[test]
    fn unknown_kind_becomes_unsupported() {
        let tree =
            parse_tree(r#"{"definitions":[{"kind":"notation","name":"gif"}]}"#).unwrap();
        assert!(matches!(tree.definitions[0], Definition::Unsupported));
        assert_eq!(tree.definitions[0].name(), None);
    }

    #[test]
    fn empty_definition_name_is_rejected() {
        let err = parse_tree(r#"{"definitions":[{"kind":"element","name":""}]}"#).unwrap_err();
        assert!(err.to_string().contains("position 0"));
    }
}
