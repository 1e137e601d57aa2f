//! The module dependency graph.
//!
//! Nodes are module names, borrowed from the [`DesignModel`]; an edge
//! `u -> v` means `u` instantiates `v`. Modules that are instantiated but
//! not declared still become nodes, so reachability sees every reference.

use std::collections::{BTreeSet, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use umbra_model::DesignModel;

/// A read-only view of "who instantiates whom".
pub struct DependencyGraph<'m> {
    graph: DiGraphMap<&'m str, ()>,
    names: HashSet<&'m str>,
}

impl<'m> DependencyGraph<'m> {
    /// Builds the graph from every module and instantiation in `model`.
    pub fn from_model(model: &'m DesignModel) -> Self {
        let mut graph = DiGraphMap::new();
        let mut names = HashSet::new();
        for module in model.iter() {
            graph.add_node(module.name.as_str());
            names.insert(module.name.as_str());
        }
        for module in model.iter() {
            for inst in &module.instantiations {
                graph.add_edge(module.name.as_str(), inst.target_module.as_str(), ());
                names.insert(inst.target_module.as_str());
            }
        }
        Self { graph, names }
    }

    /// Returns `true` if `name` is a node.
    pub fn contains(&self, name: &str) -> bool {
        self.node(name).is_some()
    }

    /// Number of modules in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Modules directly instantiated by `name`.
    pub fn children(&self, name: &str) -> Vec<&'m str> {
        match self.node(name) {
            Some(node) => self.graph.neighbors(node).collect(),
            None => Vec::new(),
        }
    }

    /// Modules reachable from `name` through one or more edges.
    pub fn descendants(&self, name: &str) -> BTreeSet<String> {
        let mut out = self.closure(name);
        let self_loop = self.node(name).is_some_and(|n| self.graph.contains_edge(n, n));
        if !self_loop {
            out.remove(name);
        }
        out
    }

    /// `name` together with every module reachable from it.
    pub fn closure(&self, name: &str) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        let Some(start) = self.node(name) else {
            return out;
        };
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(node) = dfs.next(&self.graph) {
            out.insert(node.to_string());
        }
        out
    }

    /// Members of some instantiation cycle, if there is one.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        tarjan_scc(&self.graph).into_iter().find_map(|scc| {
            let cyclic = scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]);
            cyclic.then(|| {
                let mut members: Vec<String> = scc.iter().map(|n| n.to_string()).collect();
                members.sort();
                members
            })
        })
    }

    /// Maps `name` to the node key stored in the graph.
    fn node(&self, name: &str) -> Option<&'m str> {
        self.names.get(name).copied()
    }
}
