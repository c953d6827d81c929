//! Wirescript: call script functions by name and let their arguments
//! resolve themselves.
//!
//! Every parameter of a called function is bound by name, in this order:
//! 1. an override supplied when the [`Module`] was created
//! 2. the script function with the same name, called recursively
//! 3. the parameter's own default
//!
//! Each function result is memoized once per [`Module`]. The memoized results
//! can be written out with [`Module::serialize`] as a new script in which
//! they are `[frozen]` literals, so a later run replays them.
//!
//! # Example
//!
//! ```
//! use wirescript::{Module, OverrideMap, Value};
//!
//! let source = r#"
//!     int f1(int x, int y = 2) { return x + y; }
//!     int ret_x(int x = 1) { return x; }
//! "#;
//!
//! let mut module = Module::from_source(source, OverrideMap::parse(["x=3"]).unwrap()).unwrap();
//! assert_eq!(module.call_fn("ret_x", "doc").unwrap(), Value::Int(3));
//! assert_eq!(module.call_fn("f1", "doc").unwrap(), Value::Int(5));
//! ```

mod config;
mod error;
mod interp;
mod module;
mod overrides;
mod resolve;
mod serialize;

pub use config::{DEFAULT_MAX_CALL_DEPTH, EngineConfig};
pub use error::{Error, Result};
pub use interp::{BUILTINS, Globals};
pub use module::Module;
pub use overrides::{OverrideError, OverrideMap};

// Re-export the building blocks
pub use wirescript_core::{NonSerializable, RuntimeError, SerializableShapes, Span, Value};
pub use wirescript_parser::{Parser, Script};
pub use wirescript_registry::{FunctionDef, ParamSpec, RegistryError, SignatureRegistry};
