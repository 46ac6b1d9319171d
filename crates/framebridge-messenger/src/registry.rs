use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::HandlerResult;

/// A handler for one message kind.
pub type Handler<M> = Rc<dyn Fn(&M) -> HandlerResult>;

/// Kind-keyed handler table. At most one handler per kind.
pub struct HandlerRegistry<M> {
    handlers: HashMap<String, Handler<M>>,
}

impl<M> HandlerRegistry<M> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `kind`, returning the handler it replaced.
    pub fn insert(&mut self, kind: impl Into<String>, handler: Handler<M>) -> Option<Handler<M>> {
        self.handlers.insert(kind.into(), handler)
    }

    /// Shared handle to the handler for `kind`.
    pub fn get(&self, kind: &str) -> Option<Handler<M>> {
        self.handlers.get(kind).cloned()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.handlers.keys().cloned().collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<M> Default for HandlerRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for HandlerRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn last_registration_wins() {
        let mut registry: HandlerRegistry<u32> = HandlerRegistry::new();
        let hits = Rc::new(Cell::new(0u32));

        let first = Rc::clone(&hits);
        assert!(registry
            .insert("tick", Rc::new(move |n: &u32| -> HandlerResult {
                first.set(first.get() + n);
                Ok(())
            }))
            .is_none());
        let second = Rc::clone(&hits);
        assert!(registry
            .insert("tick", Rc::new(move |n: &u32| -> HandlerResult {
                second.set(second.get() + n * 100);
                Ok(())
            }))
            .is_some());

        let handler = registry.get("tick").unwrap();
        handler(&2).unwrap();
        assert_eq!(hits.get(), 200);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn kinds_are_sorted_and_lookup_is_exact() {
        let mut registry: HandlerRegistry<()> = HandlerRegistry::default();
        registry.insert("resize", Rc::new(|_: &()| -> HandlerResult { Ok(()) }));
        registry.insert("ready", Rc::new(|_: &()| -> HandlerResult { Ok(()) }));

        assert_eq!(registry.kinds(), vec!["ready", "resize"]);
        assert!(registry.contains("ready"));
        assert!(!registry.contains("Ready"));
        assert!(registry.get("done").is_none());
    }
}
