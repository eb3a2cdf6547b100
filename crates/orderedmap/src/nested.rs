//! Access to nested values by [`Path`].
//!
//! Type mismatches report the path of the container that had the wrong
//! type; a missing key or index reports the path including the missing
//! step.

use tracing::trace;

use crate::map::NULL;
use crate::{OrderedMap, Path, PathError, Step, Value};

impl OrderedMap {
    /// Returns the value at `path`.
    ///
    /// ```
    /// use utils_orderedmap::{from_json_str, Value};
    ///
    /// let map = from_json_str(r#"{"a": {"b": [10, 20]}}"#).unwrap();
    /// assert_eq!(map.get_nested("a.b[1]").unwrap(), &Value::from(20));
    /// assert!(map.get_nested("a.c").unwrap_err().is_not_found());
    /// ```
    pub fn get_nested_path(&self, path: &Path) -> Result<&Value, PathError> {
        let (first, rest) = path.steps().split_first().ok_or(PathError::Empty)?;
        let mut at = Path::new();
        let mut current = child(Container::Map(self), first, &at)?;
        at.push(first.clone());
        for step in rest {
            current = child(Container::Value(current), step, &at)?;
            at.push(step.clone());
        }
        Ok(current)
    }

    pub fn get_nested(&self, path: &str) -> Result<&Value, PathError> {
        self.get_nested_path(&path.parse()?)
    }

    /// Like [`get_nested_path`](Self::get_nested_path), but a missing value
    /// reads as [`Value::Null`]. Other errors are still returned.
    pub fn get_nested_path_or_nil(&self, path: &Path) -> Result<&Value, PathError> {
        match self.get_nested_path(path) {
            Err(err) if err.is_not_found() => Ok(NULL),
            result => result,
        }
    }

    pub fn get_nested_or_nil(&self, path: &str) -> Result<&Value, PathError> {
        self.get_nested_path_or_nil(&path.parse()?)
    }

    /// Returns the map at `path`, `None` if nothing is there.
    pub fn get_nested_path_map(&self, path: &Path) -> Result<Option<&OrderedMap>, PathError> {
        match self.get_nested_path(path) {
            Ok(Value::Map(map)) => Ok(Some(map)),
            Ok(other) => Err(PathError::ExpectedObject {
                path: path.to_string(),
                found: other.type_name(),
            }),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn get_nested_map(&self, path: &str) -> Result<Option<&OrderedMap>, PathError> {
        self.get_nested_path_map(&path.parse()?)
    }

    /// Sets the value at `path`.
    ///
    /// Missing intermediate map keys are created as empty maps. Arrays are
    /// never extended: an index must address an existing element.
    ///
    /// ```
    /// use utils_orderedmap::{OrderedMap, Value};
    ///
    /// let mut map = OrderedMap::new();
    /// map.set_nested("parameters.foo", "bar").unwrap();
    /// assert_eq!(map.get_nested("parameters.foo").unwrap(), &Value::from("bar"));
    /// ```
    pub fn set_nested_path(&mut self, path: &Path, value: impl Into<Value>) -> Result<(), PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        set_in_map(self, path.steps(), &Path::new(), value.into())
    }

    pub fn set_nested(&mut self, path: &str, value: impl Into<Value>) -> Result<(), PathError> {
        self.set_nested_path(&path.parse()?, value)
    }
}

enum Container<'a> {
    Map(&'a OrderedMap),
    Value(&'a Value),
}

/// Looks `step` up in `container`, which is located at `at`.
fn child<'a>(container: Container<'a>, step: &Step, at: &Path) -> Result<&'a Value, PathError> {
    let not_found = || PathError::NotFound {
        path: at.with(step.clone()).to_string(),
    };
    match step {
        Step::Map(key) => {
            let map = match container {
                Container::Map(map) => map,
                Container::Value(Value::Map(map)) => map,
                Container::Value(other) => return Err(expected_object(at, other)),
            };
            map.get(key).ok_or_else(not_found)
        }
        Step::Index(index) => {
            let items = match container {
                Container::Value(Value::Array(items)) => items,
                Container::Map(_) => return Err(expected_array(at, "object")),
                Container::Value(other) => return Err(expected_array(at, &other.type_name())),
            };
            items.get(*index).ok_or_else(not_found)
        }
    }
}

fn set_in_map(map: &mut OrderedMap, steps: &[Step], at: &Path, value: Value) -> Result<(), PathError> {
    let Some((step, rest)) = steps.split_first() else {
        return Err(PathError::Empty);
    };
    let key = match step {
        Step::Map(key) => key,
        Step::Index(_) => return Err(expected_array(at, "object")),
    };
    if rest.is_empty() {
        map.set(key.as_str(), value);
        return Ok(());
    }

    let here = at.with(step.clone());
    if !map.contains_key(key) {
        // Arrays are never created, so an index below a missing key can not
        // be reached. Fail before inserting anything.
        if rest.iter().any(|step| matches!(step, Step::Index(_))) {
            return Err(PathError::NotFound { path: here.to_string() });
        }
        trace!(path = %here, "creating intermediate map");
        map.set(key.as_str(), OrderedMap::new());
    }
    match map.get_mut(key) {
        Some(next) => set_in_value(next, rest, &here, value),
        None => Err(PathError::NotFound { path: here.to_string() }),
    }
}

fn set_in_value(current: &mut Value, steps: &[Step], at: &Path, value: Value) -> Result<(), PathError> {
    let Some((step, rest)) = steps.split_first() else {
        return Err(PathError::Empty);
    };
    match (current, step) {
        (Value::Map(map), _) => set_in_map(map, steps, at, value),
        (Value::Array(items), Step::Index(index)) => {
            let here = at.with(*index);
            let Some(slot) = items.get_mut(*index) else {
                return Err(PathError::NotFound { path: here.to_string() });
            };
            if rest.is_empty() {
                *slot = value;
                Ok(())
            } else {
                set_in_value(slot, rest, &here, value)
            }
        }
        (other, Step::Map(_)) => Err(expected_object(at, other)),
        (other, Step::Index(_)) => Err(expected_array(at, &other.type_name())),
    }
}

fn expected_object(at: &Path, found: &Value) -> PathError {
    PathError::ExpectedObject {
        path: at.to_string(),
        found: found.type_name(),
    }
}

fn expected_array(at: &Path, found: &str) -> PathError {
    PathError::ExpectedArray {
        path: at.to_string(),
        found: found.to_string(),
    }
}
