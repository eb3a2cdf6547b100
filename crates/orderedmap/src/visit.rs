use crate::{OrderedMap, Path, Value};

/// Container of a visited value.
#[derive(Debug, Clone, Copy)]
pub enum Parent<'a> {
    Map(&'a OrderedMap),
    Array(&'a [Value]),
}

impl OrderedMap {
    /// Calls `callback` for every nested value, depth first and in order.
    ///
    /// Each value is visited before its children. The map itself is not
    /// visited. Values inside [`Value::Any`] are opaque and not descended
    /// into.
    pub fn visit_all_recursive<F>(&self, mut callback: F)
    where
        F: FnMut(&Path, &Value, Parent<'_>),
    {
        visit_map(self, &Path::new(), &mut callback);
    }
}

fn visit_map<F>(map: &OrderedMap, at: &Path, callback: &mut F)
where
    F: FnMut(&Path, &Value, Parent<'_>),
{
    for (key, value) in map {
        let path = at.with(key);
        callback(&path, value, Parent::Map(map));
        descend(value, &path, callback);
    }
}

fn descend<F>(value: &Value, at: &Path, callback: &mut F)
where
    F: FnMut(&Path, &Value, Parent<'_>),
{
    match value {
        Value::Map(map) => visit_map(map, at, callback),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let path = at.with(index);
                callback(&path, item, Parent::Array(items));
                descend(item, &path, callback);
            }
        }
        _ => {}
    }
}
