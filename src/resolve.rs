//! Name resolution across the proto tree.
//!
//! The resolver indexes the tree once, then answers "what does this type
//! name stand for?" by lookup. Plain-alias simple types are followed to
//! their base; list and union simple types are declarations in their own
//! right and resolve to themselves.

use std::collections::{HashMap, HashSet};

use crate::builtin::Builtin;
use crate::error::{Error, Result};
use crate::naming::trim_ns_prefix;
use crate::proto_tree::{Definition, ProtoTree};

/// Fully reduced meaning of a type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// An XSD built-in datatype.
    Builtin(Builtin),
    /// A name with no further alias to follow.
    Named {
        name: String,
        /// Whether any definition in the tree carries this name.
        known: bool,
    },
}

/// Per-run name index over a [`ProtoTree`].
#[derive(Debug)]
pub struct Resolver<'a> {
    /// Plain-alias simple type name → raw base. First definition wins.
    aliases: HashMap<&'a str, &'a str>,
    declared: HashSet<&'a str>,
    simple: HashSet<&'a str>,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a ProtoTree) -> Self {
        let mut aliases = HashMap::new();
        let mut declared = HashSet::new();
        let mut simple_names = HashSet::new();
        for definition in &tree.definitions {
            if let Definition::SimpleType(simple) = definition {
                simple_names.insert(simple.name.as_str());
                if simple.is_plain_alias() {
                    aliases
                        .entry(simple.name.as_str())
                        .or_insert(simple.base.as_str());
                }
            }
            if let Some(name) = definition.name() {
                declared.insert(name);
            }
        }
        Self {
            aliases,
            declared,
            simple: simple_names,
        }
    }

    /// One resolution hop.
    ///
    /// Strips the namespace prefix, then returns the base of the first
    /// plain-alias simple type with that name, or the stripped name itself
    /// when there is none.
    pub fn resolve_base<'s>(&'s self, name: &'s str) -> &'s str {
        let local = trim_ns_prefix(name);
        self.aliases.get(local).copied().unwrap_or(local)
    }

    /// Follow alias hops until a builtin or a non-alias name is reached.
    ///
    /// Names the tree defines take precedence over builtins of the same
    /// local name (`Name`, `token`, `date`, ...). A name is a builtin when
    /// it carries an XSD namespace prefix, or when the tree does not define
    /// it. Calling this again on a returned name yields the same result.
    pub fn resolve(&self, name: &str) -> Result<Resolved> {
        let mut current = name;
        let mut visited: HashSet<&str> = HashSet::new();
        loop {
            let local = trim_ns_prefix(current);
            if has_xsd_prefix(current) {
                if let Some(builtin) = Builtin::from_xsd(local) {
                    return Ok(Resolved::Builtin(builtin));
                }
            }
            if let Some(base) = self.aliases.get(local) {
                if !visited.insert(local) {
                    return Err(Error::AliasCycle {
                        name: local.to_string(),
                    });
                }
                current = *base;
                continue;
            }
            let known = self.declared.contains(local);
            if !known {
                if let Some(builtin) = Builtin::from_xsd(local) {
                    return Ok(Resolved::Builtin(builtin));
                }
            }
            return Ok(Resolved::Named {
                name: local.to_string(),
                known,
            });
        }
    }

    /// Whether the name belongs to a simple type (list or union once resolved).
    pub fn is_simple_type(&self, name: &str) -> bool {
        self.simple.contains(trim_ns_prefix(name))
    }
}

/// Prefixes conventionally bound to the XML Schema namespace.
const XSD_PREFIXES: &[&str] = &["xs", "xsd"];

fn has_xsd_prefix(name: &str) -> bool {
    name.split_once(':')
        .is_some_and(|(prefix, _)| XSD_PREFIXES.contains(&prefix))
}
