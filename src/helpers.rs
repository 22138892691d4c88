//! Helper capability bags.
//!
//! A bag is an additive table of named operations that handlers reach through
//! [`Context::call_helper`]. Command sets own one bag each; dispatching
//! applies the set's bag to the context before the handler runs.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::context::Context;
use crate::error::CommandError;

/// One helper operation. Receives the context and positional values.
pub type HelperFn = Rc<dyn Fn(&mut Context, &[Value]) -> Result<Value, CommandError>>;

/// Additive table of helper operations. Later definitions shadow earlier ones.
#[derive(Clone, Default)]
pub struct HelperBag {
    ops: IndexMap<String, HelperFn>,
}

impl HelperBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one operation, replacing any previous one with the same name.
    pub fn define<F>(&mut self, name: impl Into<String>, op: F) -> &mut Self
    where
        F: Fn(&mut Context, &[Value]) -> Result<Value, CommandError> + 'static,
    {
        self.ops.insert(name.into(), Rc::new(op));
        self
    }

    /// Merge every operation of `other` into this bag.
    pub fn include(&mut self, other: &HelperBag) {
        for (name, op) in &other.ops {
            self.ops.insert(name.clone(), Rc::clone(op));
        }
    }

    pub fn get(&self, name: &str) -> Option<HelperFn> {
        self.ops.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ops.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl fmt::Debug for HelperBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ops.keys()).finish()
    }
}
