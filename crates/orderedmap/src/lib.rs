//! Insertion-ordered string maps.
//!
//! [`OrderedMap`] keeps the order in which keys were first inserted, through
//! every operation that does not explicitly reorder: lookups, updates, JSON
//! and YAML round trips and deep copies. Nested values are addressed with
//! [`Path`]s such as `parameters.foo[1].bar`.
//!
//! # Example
//!
//! ```
//! use utils_orderedmap::{from_json_str, to_json_string};
//!
//! let mut map = from_json_str(r#"{"z": 1, "a": {"b": [1, 2]}}"#).unwrap();
//! map.set_nested("a.c", "x").unwrap();
//! map.set("m", true);
//! assert_eq!(map.keys(), ["z", "a", "m"]);
//! assert_eq!(
//!     to_json_string(&map).unwrap(),
//!     r#"{"z":1,"a":{"b":[1,2],"c":"x"},"m":true}"#
//! );
//! ```

mod codec;
mod copy;
mod map;
mod nested;
pub mod path;
mod value;
mod visit;

pub use codec::CodecError;
#[cfg(feature = "json")]
pub use codec::{from_json_str, to_json_string, to_json_string_pretty};
#[cfg(feature = "yaml")]
pub use codec::{from_yaml_str, to_yaml_string};
pub use map::{Iter, OrderedMap, Pair};
pub use path::{Path, PathError, Step};
pub use value::Value;
pub use visit::Parent;
