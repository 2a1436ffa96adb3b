use crate::{
    bind::{Bindable, BoundAny},
    error::{BindError, ErrorKind},
    hydrate::{HydrateOptions, Hydrator, hydrate_into_at},
    plain::{SerializeOptions, Serializer},
    source::RawSource,
    value::Value,
};
use bindery_schema::{decl::GlobalDefaults, registry::SchemaRegistry};
use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

type DynHydrateFn =
    fn(&Engine, &dyn RawSource, &HydrateOptions, usize) -> Result<Box<dyn BoundAny>, BindError>;
type DynDiscriminateFn = fn(&dyn RawSource) -> Option<&'static str>;

///
/// DynBinder
///
/// Monomorphized entry points for one registered class, stored type-erased
/// so the discriminator can pick the concrete class at runtime.
///

#[derive(Clone, Copy)]
struct DynBinder {
    hydrate: DynHydrateFn,
    discriminate: DynDiscriminateFn,
}

fn dyn_hydrate<T: Bindable>(
    engine: &Engine,
    raw: &dyn RawSource,
    opts: &HydrateOptions,
    depth: usize,
) -> Result<Box<dyn BoundAny>, BindError> {
    let mut obj = T::default();
    hydrate_into_at(engine, &mut obj, raw, opts, depth)?;

    Ok(Box::new(obj))
}

///
/// Engine
///
/// Composition root owning the schema registry and the erased binder table.
/// All binding operations hang off a borrowed engine; the engine itself is
/// freely shareable across threads.
///

#[derive(Default)]
pub struct Engine {
    schemas: SchemaRegistry,
    binders: RwLock<HashMap<&'static str, DynBinder>>,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_defaults(globals: GlobalDefaults) -> Self {
        Self {
            schemas: SchemaRegistry::with_defaults(globals),
            binders: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Register a bindable class: its declaration with the schema registry
    /// and its erased binder for dynamic hydration.
    pub fn register<T: Bindable>(&self) -> Result<(), BindError> {
        self.schemas.register(T::decl())?;
        self.write_binders().entry(T::CLASS_NAME).or_insert(DynBinder {
            hydrate: dyn_hydrate::<T>,
            discriminate: T::discriminate,
        });

        Ok(())
    }

    /// Lazy registration used by the typed paths, so nested classes only
    /// need explicit registration when reached dynamically or by name.
    pub(crate) fn ensure<T: Bindable>(&self) -> Result<(), BindError> {
        if !self.schemas.is_registered(T::CLASS_NAME) {
            return self.register::<T>();
        }
        self.write_binders().entry(T::CLASS_NAME).or_insert(DynBinder {
            hydrate: dyn_hydrate::<T>,
            discriminate: T::discriminate,
        });

        Ok(())
    }

    pub(crate) fn dyn_hydrate_by_name(
        &self,
        class: &str,
        raw: &dyn RawSource,
        opts: &HydrateOptions,
        depth: usize,
    ) -> Result<Box<dyn BoundAny>, BindError> {
        let binder = self.binder(class)?;

        // discriminator of the declared class may redirect to a more
        // specific registered class
        let binder = match (binder.discriminate)(raw) {
            Some(target) if target != class => self.binder(target)?,
            _ => binder,
        };

        (binder.hydrate)(self, raw, opts, depth)
    }

    fn binder(&self, class: &str) -> Result<DynBinder, BindError> {
        self.read_binders().get(class).copied().ok_or_else(|| {
            BindError::new(
                ErrorKind::UnknownClass,
                class,
                "class has no registered binder",
            )
        })
    }

    ///
    /// CONVENIENCE SURFACE
    ///

    #[must_use]
    pub const fn hydrator(&self) -> Hydrator<'_> {
        Hydrator::new(self)
    }

    #[must_use]
    pub const fn serializer(&self) -> Serializer<'_> {
        Serializer::new(self)
    }

    pub fn fetch<T: Bindable>(
        &self,
        raw: &dyn RawSource,
        opts: &HydrateOptions,
    ) -> Result<T, BindError> {
        self.hydrator().fetch(raw, opts)
    }

    pub fn fetch_dynamic(
        &self,
        class: &str,
        raw: &dyn RawSource,
        opts: &HydrateOptions,
    ) -> Result<Box<dyn BoundAny>, BindError> {
        self.hydrator().fetch_dynamic(class, raw, opts)
    }

    pub fn to_plain<T: Bindable>(
        &self,
        obj: &T,
        opts: &SerializeOptions,
    ) -> Result<Value, BindError> {
        self.serializer().to_plain(obj, opts)
    }

    fn read_binders(&self) -> RwLockReadGuard<'_, HashMap<&'static str, DynBinder>> {
        self.binders.read().expect("binder lock poisoned")
    }

    fn write_binders(&self) -> RwLockWriteGuard<'_, HashMap<&'static str, DynBinder>> {
        self.binders.write().expect("binder lock poisoned")
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("schemas", &self.schemas)
            .field("binders", &self.read_binders().len())
            .finish()
    }
}
