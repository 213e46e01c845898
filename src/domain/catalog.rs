//! Type catalog: the set of known type identifiers and their relationships

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::trace;

use crate::domain::descriptor::{Method, TypeDescriptor};

/// Registry of type descriptors, shared by every registry that autowires
/// against the same set of types.
#[derive(Debug, Default, Clone)]
pub struct TypeCatalog {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a descriptor.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        trace!(type_name = descriptor.name(), kind = ?descriptor.kind(), "register type");
        self.types.insert(descriptor.name().to_string(), descriptor);
        self
    }

    /// Builder-style [`TypeCatalog::register`].
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether `class` is `type_name` or transitively declares it as a supertype.
    pub fn is_subtype(&self, class: &str, type_name: &str) -> bool {
        self.ancestry(class).any(|name| name == type_name)
    }

    /// Find a method on `class`, searching supertypes breadth-first.
    pub fn find_method(&self, class: &str, method: &str) -> Option<&Method> {
        self.ancestry(class)
            .filter_map(|name| self.types.get(name))
            .find_map(|descriptor| descriptor.get_method(method))
    }

    /// `class` followed by all of its supertypes, breadth-first, each once.
    fn ancestry<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut queue: VecDeque<&'a str> = VecDeque::from([class]);
        let mut seen: HashSet<&'a str> = HashSet::new();

        std::iter::from_fn(move || {
            while let Some(name) = queue.pop_front() {
                if !seen.insert(name) {
                    continue;
                }
                if let Some(descriptor) = self.types.get(name) {
                    queue.extend(descriptor.supertypes().iter().map(String::as_str));
                }
                return Some(name);
            }
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::Value;

    struct Turbine;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(TypeDescriptor::interface("Engine"))
            .with(
                TypeDescriptor::abstract_type("BaseEngine")
                    .implements("Engine")
                    .method("spin", vec![], |_: &Turbine, _| Ok(Value::from("spinning"))),
            )
            .with(TypeDescriptor::concrete("Turbine", || Turbine).implements("BaseEngine"))
    }

    #[test]
    fn given_transitive_supertypes_when_checking_subtype_then_follows_chain() {
        let catalog = catalog();

        assert!(catalog.is_subtype("Turbine", "Turbine"));
        assert!(catalog.is_subtype("Turbine", "BaseEngine"));
        assert!(catalog.is_subtype("Turbine", "Engine"));
        assert!(!catalog.is_subtype("Engine", "Turbine"));
    }

    #[test]
    fn given_unknown_class_when_checking_subtype_then_only_matches_itself() {
        let catalog = catalog();
        assert!(catalog.is_subtype("Unknown", "Unknown"));
        assert!(!catalog.is_subtype("Unknown", "Engine"));
    }

    #[test]
    fn given_inherited_method_when_finding_then_resolves_from_supertype() {
        let catalog = catalog();
        assert!(catalog.find_method("Turbine", "spin").is_some());
        assert!(catalog.find_method("Turbine", "missing").is_none());
    }

    #[test]
    fn given_registered_types_when_counting_then_len_matches() {
        assert!(TypeCatalog::new().is_empty());

        let catalog = catalog();

        assert!(!catalog.is_empty());
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("Engine"));
    }

    #[test]
    fn given_supertype_cycle_when_walking_then_terminates() {
        let catalog = TypeCatalog::new()
            .with(TypeDescriptor::interface("A").implements("B"))
            .with(TypeDescriptor::interface("B").implements("A"));

        assert!(catalog.is_subtype("A", "B"));
        assert!(!catalog.is_subtype("A", "C"));
    }
}
