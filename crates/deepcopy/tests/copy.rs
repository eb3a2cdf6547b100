use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use proptest::prelude::*;
use utils_deepcopy::{
    copy, copy_translate, copy_translate_steps, deep_copy_struct, CopyError, DynCopy, Path, Step, VisitedPtrMap,
    DUMP_LIMIT,
};

#[derive(Debug, Default, PartialEq)]
struct Bar {
    key1: String,
    key2: String,
    key3: Option<Box<dyn DynCopy>>,
}

deep_copy_struct!(Bar { key1, key2, key3 });

#[derive(Debug, Default, PartialEq)]
struct Foo {
    values: Vec<Box<Bar>>,
    native: HashMap<String, i32>,
}

deep_copy_struct!(Foo { values, native });

#[derive(Debug, Default, PartialEq)]
struct Diamond {
    left: Option<Rc<RefCell<Bar>>>,
    right: Option<Rc<RefCell<Bar>>>,
}

deep_copy_struct!(Diamond { left, right });

#[derive(Debug, Default, PartialEq)]
struct Node {
    name: String,
    next: Option<Rc<RefCell<Node>>>,
}

deep_copy_struct!(Node { name, next });

#[derive(Debug, PartialEq)]
struct UnExportedFields {
    key1: String,
    key2: String,
}

deep_copy_struct!(UnExportedFields { #[private] key1, #[private] key2 });

#[derive(Debug, PartialEq)]
struct Mixed {
    visible: String,
    hidden: Box<UnExportedFields>,
}

deep_copy_struct!(Mixed { visible, hidden });

#[derive(Debug, Default)]
struct Looped {
    name: String,
    me: Option<Rc<RefCell<Looped>>>,
}

deep_copy_struct!(Looped { name, #[private] me });

/// Asserts two values are equal and share no heap allocation, at any depth.
trait NotShared {
    fn assert_not_shared(&self, other: &Self);
}

impl NotShared for i32 {
    fn assert_not_shared(&self, other: &Self) {
        assert_eq!(self, other);
    }
}

impl NotShared for String {
    fn assert_not_shared(&self, other: &Self) {
        assert_eq!(self, other);
        if !self.is_empty() {
            assert!(!std::ptr::eq(self.as_ptr(), other.as_ptr()), "string {self:?} is shared");
        }
    }
}

impl NotShared for Box<dyn DynCopy> {
    fn assert_not_shared(&self, other: &Self) {
        assert!(**self == **other);
        let a = &**self as *const dyn DynCopy as *const u8;
        let b = &**other as *const dyn DynCopy as *const u8;
        assert!(!std::ptr::eq(a, b), "dynamic value is shared");
    }
}

impl<T: NotShared> NotShared for Option<T> {
    fn assert_not_shared(&self, other: &Self) {
        match (self, other) {
            (Some(a), Some(b)) => a.assert_not_shared(b),
            (None, None) => {}
            _ => panic!("one side is None"),
        }
    }
}

impl<T: NotShared> NotShared for Vec<T> {
    fn assert_not_shared(&self, other: &Self) {
        assert_eq!(self.len(), other.len());
        if !self.is_empty() {
            assert!(!std::ptr::eq(self.as_ptr(), other.as_ptr()), "vec buffer is shared");
        }
        for (a, b) in self.iter().zip(other) {
            a.assert_not_shared(b);
        }
    }
}

impl NotShared for HashMap<String, i32> {
    fn assert_not_shared(&self, other: &Self) {
        assert_eq!(self.len(), other.len());
        for (key, value) in self {
            let (other_key, other_value) = other.get_key_value(key).unwrap();
            key.assert_not_shared(other_key);
            value.assert_not_shared(other_value);
        }
    }
}

impl NotShared for Box<Bar> {
    fn assert_not_shared(&self, other: &Self) {
        assert!(!std::ptr::eq(&**self, &**other), "record is shared");
        self.key1.assert_not_shared(&other.key1);
        self.key2.assert_not_shared(&other.key2);
        self.key3.assert_not_shared(&other.key3);
    }
}

impl NotShared for Foo {
    fn assert_not_shared(&self, other: &Self) {
        self.values.assert_not_shared(&other.values);
        self.native.assert_not_shared(&other.native);
    }
}

fn bar(key1: &str, key2: &str) -> Bar {
    Bar {
        key1: key1.to_string(),
        key2: key2.to_string(),
        key3: None,
    }
}

fn input_value() -> Foo {
    Foo {
        values: vec![
            Box::new(Bar {
                key3: Some(Box::new(123_i64)),
                ..bar("value1", "value2")
            }),
            Box::new(bar("value3", "value4")),
        ],
        native: HashMap::from([("foo".to_string(), 123)]),
    }
}

#[test]
fn copy_is_equal_and_owns_new_allocations() {
    let original = input_value();
    let clone = copy(&original).unwrap();
    assert_eq!(original, clone);
    original.assert_not_shared(&clone);
}

#[test]
fn copy_owns_nested_dynamic_values() {
    let original = Foo {
        values: vec![Box::new(Bar {
            key3: Some(Box::new(vec!["deep".to_string()])),
            ..bar("", "x")
        })],
        native: HashMap::new(),
    };
    let clone = copy(&original).unwrap();
    original.assert_not_shared(&clone);
    let inner = |foo: &Foo| {
        foo.values[0]
            .key3
            .as_ref()
            .and_then(|v| v.downcast_ref::<Vec<String>>())
            .map(|v| v[0].as_ptr())
            .unwrap()
    };
    assert!(!std::ptr::eq(inner(&original), inner(&clone)));
}

#[test]
fn copy_preserves_aliasing() {
    let shared = Rc::new(RefCell::new(bar("a", "b")));
    let original = Diamond {
        left: Some(Rc::clone(&shared)),
        right: Some(Rc::clone(&shared)),
    };
    let clone = copy(&original).unwrap();
    let (left, right) = (clone.left.unwrap(), clone.right.unwrap());
    assert!(Rc::ptr_eq(&left, &right));
    assert!(!Rc::ptr_eq(&left, &shared));
    assert_eq!(*left.borrow(), *shared.borrow());
}

#[test]
fn copy_terminates_on_cycles() {
    let node = Rc::new(RefCell::new(Node {
        name: "self".to_string(),
        next: None,
    }));
    node.borrow_mut().next = Some(Rc::clone(&node));

    let clone = copy(&node).unwrap();
    assert!(!Rc::ptr_eq(&node, &clone));
    let next = clone.borrow().next.clone().unwrap();
    assert!(Rc::ptr_eq(&next, &clone));
    assert_eq!(clone.borrow().name, "self");

    // Break the cycles so the test does not leak.
    node.borrow_mut().next = None;
    clone.borrow_mut().next = None;
}

#[test]
fn copy_two_node_cycle() {
    let a = Rc::new(RefCell::new(Node {
        name: "a".to_string(),
        next: None,
    }));
    let b = Rc::new(RefCell::new(Node {
        name: "b".to_string(),
        next: Some(Rc::clone(&a)),
    }));
    a.borrow_mut().next = Some(Rc::clone(&b));

    let a2 = copy(&a).unwrap();
    let b2 = a2.borrow().next.clone().unwrap();
    assert_eq!(b2.borrow().name, "b");
    assert!(Rc::ptr_eq(&b2.borrow().next.clone().unwrap(), &a2));
    assert!(!Rc::ptr_eq(&b2, &b));

    a.borrow_mut().next = None;
    a2.borrow_mut().next = None;
}

#[test]
fn translate_modifies_every_string() {
    let clone = copy_translate(&input_value(), |_: &dyn Any, clone: &mut dyn Any, _: &Path| {
        if let Some(s) = clone.downcast_mut::<String>() {
            s.push_str("_modified");
        }
    })
    .unwrap();

    assert_eq!(clone.values[0].key1, "value1_modified");
    assert_eq!(clone.values[1].key2, "value4_modified");
    assert_eq!(clone.native.get("foo_modified"), Some(&123));
    assert_eq!(
        clone.values[0].key3.as_ref().and_then(|v| v.downcast_ref::<i64>()),
        Some(&123)
    );
}

#[test]
fn translate_receives_paths_bottom_up() {
    let original = Box::new(Bar {
        key3: Some(Box::new(123_i64)),
        ..bar("abc", "def")
    });
    let mut paths = Vec::new();
    copy_translate(&original, |_: &dyn Any, _: &mut dyn Any, path: &Path| paths.push(path.to_string())).unwrap();
    assert_eq!(
        paths,
        vec![
            "*Bar[key1].string",
            "*Bar[key2].string",
            "*Bar[key3].interface[i64].int",
            "*Bar[key3].interface",
            "*Bar[key3].option",
            "*struct",
            "ptr",
        ]
    );
}

#[test]
fn translate_can_write_paths_into_values() {
    let clone = copy_translate(&input_value(), |_: &dyn Any, clone: &mut dyn Any, path: &Path| {
        if path.contains_key_step() {
            return;
        }
        if let Some(s) = clone.downcast_mut::<String>() {
            *s = path.to_string();
        }
    })
    .unwrap();
    assert_eq!(clone.values[0].key1, "Foo[values].slice[0].*Bar[key1].string");
    assert_eq!(clone.values[1].key2, "Foo[values].slice[1].*Bar[key2].string");
    assert!(clone.native.contains_key("foo"));
}

#[test]
fn unexported_field_aborts_copy() {
    let original = Mixed {
        visible: "v".to_string(),
        hidden: Box::new(UnExportedFields {
            key1: "a".to_string(),
            key2: "b".to_string(),
        }),
    };
    let err = copy(&original).unwrap_err();
    assert_eq!(
        err,
        CopyError::UnexportedField {
            path: "Mixed[hidden].*UnExportedFields[key1]".to_string(),
            value: r#"UnExportedFields { key1: "a", key2: "b" }"#.to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "deepcopy found unexported field:\n  path: Mixed[hidden].*UnExportedFields[key1]\n  value: UnExportedFields { key1: \"a\", key2: \"b\" }"
    );
}

#[test]
fn unexported_field_in_cycle_reports_bounded_dump() {
    let node = Rc::new(RefCell::new(Looped {
        name: "loop".to_string(),
        me: None,
    }));
    node.borrow_mut().me = Some(Rc::clone(&node));

    let err = copy(&*node.borrow()).unwrap_err();
    let CopyError::UnexportedField { path, value } = err;
    assert_eq!(path, "Looped[me]");
    assert!(value.starts_with(r#"Looped { name: "loop", me: Some(RefCell { value: Looped {"#));
    assert!(value.ends_with("..."));
    assert!(value.len() <= DUMP_LIMIT + 3);

    node.borrow_mut().me = None;
}

#[test]
fn shared_visited_map_links_copies() {
    let shared = Rc::new(RefCell::new(bar("a", "b")));
    let mut visited = VisitedPtrMap::new();
    let base = Path::new().add(Step::Type("batch".into()));

    let first = copy_translate_steps(&shared, None, &base, &mut visited).unwrap();
    let second = copy_translate_steps(&shared, None, &base, &mut visited).unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(visited.len(), 1);

    let separate = copy(&shared).unwrap();
    assert!(!Rc::ptr_eq(&first, &separate));
}

proptest! {
    #[test]
    fn copy_round_trips_nested_collections(
        values in proptest::collection::vec(proptest::collection::vec(any::<String>(), 0..4), 0..6),
        map in proptest::collection::hash_map(any::<String>(), any::<i64>(), 0..6),
    ) {
        prop_assert_eq!(copy(&values).unwrap(), values);
        prop_assert_eq!(copy(&map).unwrap(), map);
    }
}
