use crate::{
    decl::{ClassDecl, GlobalDefaults},
    error::SchemaError,
    resolve,
    resolved::ClassSchema,
};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

type UnwrapHook = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

///
/// SchemaRegistry
///
/// Caller-owned declaration table plus the per-class resolution cache.
/// Resolution is pure, so concurrent first resolutions of the same class
/// compute equal schemas; the first insert wins and later duplicates are
/// discarded. A cached schema is immutable for the registry's lifetime.
///

#[derive(Default)]
pub struct SchemaRegistry {
    globals: GlobalDefaults,
    decls: RwLock<HashMap<String, ClassDecl>>,
    cache: RwLock<HashMap<String, Arc<ClassSchema>>>,
    unwrap_hook: RwLock<Option<UnwrapHook>>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_defaults(globals: GlobalDefaults) -> Self {
        Self {
            globals,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn globals(&self) -> &GlobalDefaults {
        &self.globals
    }

    /// Register a class declaration. Re-registering an identical declaration
    /// is a no-op; a conflicting one is an error.
    pub fn register(&self, decl: ClassDecl) -> Result<(), SchemaError> {
        let mut decls = self.write_decls();
        if let Some(existing) = decls.get(&decl.name) {
            if *existing == decl {
                return Ok(());
            }
            return Err(SchemaError::DuplicateClass { class: decl.name });
        }
        decls.insert(decl.name.clone(), decl);

        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, class: &str) -> bool {
        self.read_decls().contains_key(class)
    }

    /// Redirect runtime-proxy class names to their schema-bearing class
    /// before resolution.
    pub fn set_unwrap_hook<F>(&self, hook: F)
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        *self
            .unwrap_hook
            .write()
            .expect("unwrap hook lock poisoned") = Some(Box::new(hook));
    }

    /// Resolve a class schema, cached by class identity. Idempotent:
    /// re-resolution always produces an equal schema.
    pub fn resolve(&self, class: &str) -> Result<Arc<ClassSchema>, SchemaError> {
        let class = self.unwrap_class(class);

        if let Some(schema) = self
            .cache
            .read()
            .expect("schema cache lock poisoned")
            .get(&class)
        {
            return Ok(Arc::clone(schema));
        }

        let schema = {
            let decls = self.read_decls();
            Arc::new(resolve::resolve(&decls, &self.globals, &class)?)
        };

        let mut cache = self.cache.write().expect("schema cache lock poisoned");
        let entry = cache.entry(class).or_insert(schema);

        Ok(Arc::clone(entry))
    }

    fn unwrap_class(&self, class: &str) -> String {
        let hook = self.unwrap_hook.read().expect("unwrap hook lock poisoned");
        hook.as_ref()
            .and_then(|h| h(class))
            .unwrap_or_else(|| class.to_string())
    }

    fn read_decls(&self) -> RwLockReadGuard<'_, HashMap<String, ClassDecl>> {
        self.decls.read().expect("declaration lock poisoned")
    }

    fn write_decls(&self) -> RwLockWriteGuard<'_, HashMap<String, ClassDecl>> {
        self.decls.write().expect("declaration lock poisoned")
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("globals", &self.globals)
            .field("classes", &self.read_decls().len())
            .finish_non_exhaustive()
    }
}
