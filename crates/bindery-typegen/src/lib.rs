//! TypeScript generation from resolved class schemas: one structural
//! interface, one binder function, and one wrapper class per class, with
//! dependency classes emitted first.

mod ts;

pub use ts::TsGenerator;

pub mod prelude {
    pub use crate::TsGenerator;
}
