//! The structural design model: modules, ports and instantiations.
//!
//! A [`DesignModel`] maps module names to [`Module`]s and iterates them in
//! declaration order: modules in source order first, then synthesized stubs
//! in the order they were created. Names are unique; [`DesignModel::insert`]
//! rejects a second module of the same name and hands it back to the caller.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use umbra_common::Direction;
use umbra_source::Span;

/// A declared or inferred module port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Port {
    /// Port name.
    pub name: String,
    /// Port direction; [`Direction::Unknown`] only until inference completes.
    pub direction: Direction,
    /// Width in bits, at least 1. Ranges that are not numeric literals count as 1.
    pub width: u32,
}

impl Port {
    /// Creates a new port.
    pub fn new(name: impl Into<String>, direction: Direction, width: u32) -> Self {
        Self {
            name: name.into(),
            direction,
            width: width.max(1),
        }
    }
}

/// The width implied by the actual side of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActualWidth {
    /// A width in bits.
    Resolved(u32),
    /// The expression was not understood (parameters, macros, operators).
    Unresolved,
    /// Nothing is wired to the port.
    Unconnected,
}

impl ActualWidth {
    /// Returns the width if resolved.
    pub fn bits(self) -> Option<u32> {
        match self {
            ActualWidth::Resolved(w) => Some(w),
            _ => None,
        }
    }
}

/// One formal-to-actual port connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Connection {
    /// Formal port name, or `port_<index>` for positional connections.
    pub formal: String,
    /// Actual expression text, `None` when unwired.
    pub actual: Option<String>,
    /// Width implied by the actual.
    pub width: ActualWidth,
    /// Location of the connection.
    pub span: Span,
}

/// Formal name used for the positional connection at `index`.
pub fn positional_formal(index: usize) -> String {
    format!("port_{index}")
}

/// One instantiation of a module inside another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Instantiation {
    /// Name of the instantiated module.
    pub target_module: String,
    /// Instance name.
    pub instance_name: String,
    /// Connections in source order.
    pub connections: Vec<Connection>,
    /// From the module type name to the closing parenthesis.
    pub span: Span,
}

/// A module declaration or synthesized stub.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Ports in header order.
    pub ports: Vec<Port>,
    /// Instantiations in source order.
    pub instantiations: Vec<Instantiation>,
    /// Contents of `(* ... *)` attributes immediately before the header.
    pub attributes: Vec<String>,
    /// From `module` to `endmodule`; `None` for synthesized stubs.
    pub span: Option<Span>,
    /// Declared nets and their widths; `None` for non-literal ranges.
    #[serde(skip)]
    pub nets: BTreeMap<String, Option<u32>>,
    /// Created by interface synthesis rather than read from the input.
    pub is_synthesized_stub: bool,
    /// Below the boundary and not preserved; set only by propagation.
    pub is_blackboxed: bool,
    /// Carried the boundary marker attribute in the input text.
    pub marked_in_input: bool,
}

impl Module {
    /// Creates an empty declared module.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
            instantiations: Vec::new(),
            attributes: Vec::new(),
            span: Some(span),
            nets: BTreeMap::new(),
            is_synthesized_stub: false,
            is_blackboxed: false,
            marked_in_input: false,
        }
    }

    /// Creates a synthesized stub with the given ports.
    pub fn stub(name: impl Into<String>, ports: Vec<Port>) -> Self {
        Self {
            name: name.into(),
            ports,
            instantiations: Vec::new(),
            attributes: Vec::new(),
            span: None,
            nets: BTreeMap::new(),
            is_synthesized_stub: true,
            is_blackboxed: false,
            marked_in_input: false,
        }
    }

    /// Returns the port named `name`.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Returns `true` if any attribute before the header names `attr`.
    ///
    /// `(* keep, blackbox = 1 *)` names both `keep` and `blackbox`.
    pub fn has_attribute(&self, attr: &str) -> bool {
        self.attributes.iter().any(|text| {
            text.split(',')
                .map(|item| item.split('=').next().unwrap_or("").trim())
                .any(|name| name == attr)
        })
    }

    /// Byte offset at which a boundary marker is inserted, if the module came
    /// from the input text.
    pub fn marker_offset(&self) -> Option<u32> {
        self.span.map(|s| s.start)
    }
}

/// All modules of one design, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct DesignModel {
    modules: Vec<Module>,
    index: HashMap<String, usize>,
    primitives: BTreeSet<String>,
}

impl DesignModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module. Returns it back if the name is already taken.
    pub fn insert(&mut self, module: Module) -> Result<(), Module> {
        if self.index.contains_key(&module.name) {
            return Err(module);
        }
        self.index.insert(module.name.clone(), self.modules.len());
        self.modules.push(module);
        Ok(())
    }

    /// Records a user-defined primitive (`primitive ... endprimitive`).
    pub fn add_primitive(&mut self, name: impl Into<String>) {
        self.primitives.insert(name.into());
    }

    /// Returns `true` if `name` is a user-defined primitive.
    pub fn is_primitive(&self, name: &str) -> bool {
        self.primitives.contains(name)
    }

    /// Looks up a module by name.
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.index.get(name).map(|&i| &self.modules[i])
    }

    /// Looks up a module by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Module> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.modules[i]),
            None => None,
        }
    }

    /// Returns `true` if a module named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates modules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Iterates modules mutably in declaration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.modules.iter_mut()
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if the model has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Names of instantiated modules that are neither declared nor
    /// primitives, in first-seen order.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut dangling = Vec::new();
        for module in &self.modules {
            for inst in &module.instantiations {
                let target = inst.target_module.as_str();
                if self.contains(target) || self.is_primitive(target) {
                    continue;
                }
                if seen.insert(target) {
                    dangling.push(target.to_string());
                }
            }
        }
        dangling
    }

    /// All instantiations of `target`, in model order.
    pub fn instantiations_of<'a>(
        &'a self,
        target: &'a str,
    ) -> impl Iterator<Item = &'a Instantiation> + 'a {
        self.modules
            .iter()
            .flat_map(|m| m.instantiations.iter())
            .filter(move |inst| inst.target_module == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(target: &str, name: &str) -> Instantiation {
        Instantiation {
            target_module: target.to_string(),
            instance_name: name.to_string(),
            connections: Vec::new(),
            span: Span::DUMMY,
        }
    }

    fn module_with(name: &str, insts: &[(&str, &str)]) -> Module {
        let mut m = Module::new(name, Span::DUMMY);
        m.instantiations = insts.iter().map(|(t, n)| inst(t, n)).collect();
        m
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut model = DesignModel::new();
        assert!(model.insert(Module::new("top", Span::DUMMY)).is_ok());
        let rejected = model.insert(Module::new("top", Span::DUMMY)).unwrap_err();
        assert_eq!(rejected.name, "top");
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut model = DesignModel::new();
        for name in ["zeta", "alpha", "mid"] {
            model.insert(Module::new(name, Span::DUMMY)).unwrap();
        }
        let names: Vec<_> = model.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn dangling_references_first_seen_order() {
        let mut model = DesignModel::new();
        model
            .insert(module_with("top", &[("b_ext", "u0"), ("a_ext", "u1"), ("b_ext", "u2")]))
            .unwrap();
        model
            .insert(module_with("core", &[("top", "t"), ("c_ext", "u3")]))
            .unwrap();
        assert_eq!(model.dangling_references(), vec!["b_ext", "a_ext", "c_ext"]);
    }

    #[test]
    fn primitives_are_not_dangling() {
        let mut model = DesignModel::new();
        model.insert(module_with("top", &[("my_udp", "p0")])).unwrap();
        model.add_primitive("my_udp");
        assert!(model.dangling_references().is_empty());
    }

    #[test]
    fn instantiations_of_collects_across_modules() {
        let mut model = DesignModel::new();
        model.insert(module_with("a", &[("leaf", "x")])).unwrap();
        model.insert(module_with("b", &[("leaf", "y"), ("other", "z")])).unwrap();
        let names: Vec<_> = model
            .instantiations_of("leaf")
            .map(|i| i.instance_name.as_str())
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn attribute_lookup() {
        let mut m = Module::new("m", Span::DUMMY);
        m.attributes.push("keep, blackbox = 1".to_string());
        assert!(m.has_attribute("blackbox"));
        assert!(m.has_attribute("keep"));
        assert!(!m.has_attribute("black"));
    }

    #[test]
    fn stubs_have_no_span() {
        let stub = Module::stub("leaf_ext", vec![Port::new("a", Direction::Input, 8)]);
        assert!(stub.is_synthesized_stub);
        assert_eq!(stub.marker_offset(), None);
        assert_eq!(stub.port("a").map(|p| p.width), Some(8));
    }

    #[test]
    fn port_width_is_at_least_one() {
        assert_eq!(Port::new("p", Direction::Output, 0).width, 1);
    }

    #[test]
    fn actual_width_bits() {
        assert_eq!(ActualWidth::Resolved(4).bits(), Some(4));
        assert_eq!(ActualWidth::Unresolved.bits(), None);
        assert_eq!(ActualWidth::Unconnected.bits(), None);
    }
}
