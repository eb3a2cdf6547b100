use std::fmt;

/// Runtime kind of a copied node.
///
/// Translate callbacks receive the kind as the last [`Step::Type`](crate::Step::Type)
/// of their path, e.g. `...Bar[key1].string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    Char,
    String,
    Unit,
    Number,
    Option,
    Ptr,
    Interface,
    Struct,
    Slice,
    Map,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Char => "char",
            Kind::String => "string",
            Kind::Unit => "unit",
            Kind::Number => "number",
            Kind::Option => "option",
            Kind::Ptr => "ptr",
            Kind::Interface => "interface",
            Kind::Struct => "struct",
            Kind::Slice => "slice",
            Kind::Map => "map",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Short name of `T` with module paths stripped from every segment.
///
/// ```
/// use utils_deepcopy::type_name;
///
/// assert_eq!(type_name::<String>(), "String");
/// assert_eq!(type_name::<Vec<Option<String>>>(), "Vec<Option<String>>");
/// ```
pub fn type_name<T: ?Sized>() -> String {
    short_type_name(std::any::type_name::<T>())
}

pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut start = 0;
    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' | '*') {
            push_last_segment(&mut out, &full[start..i]);
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    push_last_segment(&mut out, &full[start..]);
    out
}

fn push_last_segment(out: &mut String, segment: &str) {
    out.push_str(segment.rsplit("::").next().unwrap_or(segment));
}
