//! Dependency ordering for component types.
//!
//! A type must be created after its super type and its parent type. Types
//! referenced but not present in the list are treated as already known.
//! Among types whose dependencies are satisfied the input order is kept.

use std::collections::{BTreeSet, HashMap};

use cfgx_core::{ComponentType, ConfigError, ConfigResult};

use super::element::Element;
use super::element_names::component_types::component_type as names;
use super::element_names::common;

/// Indices of `nodes` in dependency order. Each node is `(name, depends_on)`.
pub fn dependency_order(nodes: &[(&str, Vec<&str>)]) -> ConfigResult<Vec<usize>> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, (name, _)) in nodes.iter().enumerate() {
        index.entry(*name).or_insert(i);
    }

    let mut indegree = vec![0usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (i, (name, deps)) in nodes.iter().enumerate() {
        let mut seen = BTreeSet::new();
        for dep in deps {
            if dep == name {
                return Err(ConfigError::CyclicTypeHierarchy(name.to_string()));
            }
            if let Some(&j) = index.get(dep) {
                if seen.insert(j) {
                    indegree[i] += 1;
                    dependents[j].push(i);
                }
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..nodes.len()).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &d in &dependents[i] {
            indegree[d] -= 1;
            if indegree[d] == 0 {
                ready.insert(d);
            }
        }
    }

    if order.len() < nodes.len() {
        let stuck: Vec<&str> = (0..nodes.len())
            .filter(|&i| indegree[i] > 0)
            .map(|i| nodes[i].0)
            .collect();
        return Err(ConfigError::CyclicTypeHierarchy(stuck.join(", ")));
    }
    Ok(order)
}

/// `<ComponentType>` elements in creation order.
pub fn order_component_type_elements<'a>(elements: &[&'a Element]) -> ConfigResult<Vec<&'a Element>> {
    let nodes: Vec<(&str, Vec<&str>)> = elements
        .iter()
        .map(|e| {
            let deps = [names::SUPER_COMPONENT_TYPE, names::PARENT_COMPONENT_TYPE]
                .iter()
                .filter_map(|attr| e.attribute(attr))
                .filter(|v| !v.trim().is_empty())
                .collect();
            (e.attribute(common::NAME).unwrap_or_default(), deps)
        })
        .collect();

    let order = dependency_order(&nodes)?;
    Ok(order.into_iter().map(|i| elements[i]).collect())
}

/// Component types in creation order.
pub fn order_component_types<'a>(types: &[&'a ComponentType]) -> ConfigResult<Vec<&'a ComponentType>> {
    let nodes: Vec<(&str, Vec<&str>)> = types
        .iter()
        .map(|t| {
            let deps = t
                .super_type
                .iter()
                .chain(t.parent_type.iter())
                .map(|id| id.name())
                .collect();
            (t.name(), deps)
        })
        .collect();

    let order = dependency_order(&nodes)?;
    Ok(order.into_iter().map(|i| types[i]).collect())
}
