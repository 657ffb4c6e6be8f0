//! Indirection analysis for recursive declarations.
//!
//! A struct that contains itself by value, directly or through other
//! declarations, has no finite size in Go or Rust. Members whose by-value
//! reference stays inside one strongly connected component of the
//! containment graph are marked [`Member::indirect`](crate::decl::Member),
//! and renderers hold them through a pointer or box. Sequences already
//! store their items out of line and never need marking.

use std::collections::HashMap;

use crate::decl::{Declaration, Shape};

/// Mark every member that closes a by-value containment cycle.
///
/// Returns the number of members marked.
pub fn mark_indirections(decls: &mut [Declaration]) -> usize {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(decls.len());
    for (i, decl) in decls.iter().enumerate() {
        index.entry(decl.name.clone()).or_insert(i);
    }

    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); decls.len()];
    for (i, decl) in decls.iter().enumerate() {
        for target in by_value_targets(decl) {
            if let Some(&j) = index.get(target) {
                edges[i].push(j);
            }
        }
    }

    let component = strongly_connected_components(&edges);

    let mut marked = 0;
    for (i, decl) in decls.iter_mut().enumerate() {
        for member in decl.members_mut() {
            if !member.holds_by_value() {
                continue;
            }
            let Some(&j) = member.ty.named().and_then(|name| index.get(name)) else {
                continue;
            };
            if component[i] == component[j] && !member.indirect {
                member.indirect = true;
                marked += 1;
            }
        }
    }
    marked
}

/// Names of declarations held inline by `decl`.
fn by_value_targets(decl: &Declaration) -> Vec<&str> {
    match &decl.shape {
        Shape::Alias(ty) if !ty.plural => ty.named().into_iter().collect(),
        Shape::Alias(_) | Shape::Any => Vec::new(),
        Shape::Struct(members) | Shape::Union(members) => members
            .iter()
            .filter(|m| m.holds_by_value())
            .filter_map(|m| m.ty.named())
            .collect(),
    }
}

/// Kosaraju's algorithm, iterative so deep schemas cannot overflow the stack.
///
/// Returns a component id per node.
fn strongly_connected_components(edges: &[Vec<usize>]) -> Vec<usize> {
    let n = edges.len();

    // Pass 1: post-order over the forward graph.
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut stack = vec![(start, 0usize)];
        while let Some(top) = stack.len().checked_sub(1) {
            let (node, next) = stack[top];
            if next < edges[node].len() {
                stack[top].1 += 1;
                let child = edges[node][next];
                if !visited[child] {
                    visited[child] = true;
                    stack.push((child, 0));
                }
            } else {
                order.push(node);
                stack.pop();
            }
        }
    }

    // Pass 2: flood the reversed graph in reverse post-order.
    let mut reversed: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (from, targets) in edges.iter().enumerate() {
        for &to in targets {
            reversed[to].push(from);
        }
    }
    let mut component = vec![usize::MAX; n];
    let mut next_id = 0;
    for &root in order.iter().rev() {
        if component[root] != usize::MAX {
            continue;
        }
        component[root] = next_id;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for &pred in &reversed[node] {
                if component[pred] == usize::MAX {
                    component[pred] = next_id;
                    stack.push(pred);
                }
            }
        }
        next_id += 1;
    }
    component
}
