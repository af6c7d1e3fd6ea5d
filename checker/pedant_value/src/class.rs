//! User-defined classes and instances.

use std::fmt;
use std::sync::Arc;

/// A user-defined class: a name plus its base-class chain.
///
/// Nominal instance checks walk `bases` transitively, so a `Child` instance
/// satisfies an `Exact(Parent)` annotation.
#[derive(Clone, Debug)]
pub struct ClassDef {
    name: Arc<str>,
    bases: Vec<Arc<ClassDef>>,
}

impl ClassDef {
    pub fn new(name: impl Into<Arc<str>>) -> Arc<Self> {
        Arc::new(ClassDef {
            name: name.into(),
            bases: Vec::new(),
        })
    }

    pub fn with_bases(name: impl Into<Arc<str>>, bases: Vec<Arc<ClassDef>>) -> Arc<Self> {
        Arc::new(ClassDef {
            name: name.into(),
            bases,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[Arc<ClassDef>] {
        &self.bases
    }

    /// True iff this class is `name` or has `name` anywhere in its
    /// base-class chain.
    pub fn is_subclass_of(&self, name: &str) -> bool {
        if &*self.name == name {
            return true;
        }
        self.bases.iter().any(|base| base.is_subclass_of(name))
    }
}

impl PartialEq for ClassDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An instance of a user-defined class.
///
/// The checker only needs the class identity; instance state is opaque.
#[derive(Clone, Debug)]
pub struct InstanceValue {
    class: Arc<ClassDef>,
}

impl InstanceValue {
    pub fn new(class: Arc<ClassDef>) -> Self {
        InstanceValue { class }
    }

    pub fn class(&self) -> &ClassDef {
        &self.class
    }
}

impl PartialEq for InstanceValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.class, &other.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subclass_chain_is_transitive() {
        let animal = ClassDef::new("Animal");
        let mammal = ClassDef::with_bases("Mammal", vec![animal.clone()]);
        let dog = ClassDef::with_bases("Dog", vec![mammal]);

        assert!(dog.is_subclass_of("Dog"));
        assert!(dog.is_subclass_of("Mammal"));
        assert!(dog.is_subclass_of("Animal"));
        assert!(!dog.is_subclass_of("Fish"));
        assert!(!animal.is_subclass_of("Dog"));
    }

    #[test]
    fn instance_knows_its_class() {
        let node = ClassDef::new("Node");
        let instance = InstanceValue::new(node);
        assert_eq!(instance.class().name(), "Node");
    }
}
