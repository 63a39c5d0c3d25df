//! Fixtures shared by the graph unit tests.

use std::sync::Arc;

use super::object::GraphObject;

#[derive(Debug, Clone)]
pub struct TestObject {
    pub name: String,
    pub label: Option<String>,
    pub deps: Vec<String>,
}

impl GraphObject for TestObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.name.clone())
    }

    fn dependencies(&self) -> Vec<String> {
        self.deps.clone()
    }
}

pub fn obj(name: &str, deps: &[&str]) -> TestObject {
    TestObject {
        name: name.to_string(),
        label: None,
        deps: deps.iter().map(|d| d.to_string()).collect(),
    }
}

pub fn objects(specs: &[(&str, &[&str])]) -> Vec<Arc<TestObject>> {
    specs
        .iter()
        .map(|(name, deps)| Arc::new(obj(name, deps)))
        .collect()
}
