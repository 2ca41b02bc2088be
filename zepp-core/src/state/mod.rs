//! Reactive state: property values, plain records, and the interceptable
//! view that connects them to the dependency graph.

mod object;
mod reactive;
mod value;

pub use object::Object;
pub use reactive::{reactive, Reactive};
pub use value::{FromValue, SameValue, Value};
