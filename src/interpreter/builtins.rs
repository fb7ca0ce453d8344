// Library surface the interpreter understands: collection types and the member-call allow-list

use crate::runtime::Value;

/// Container shape a declared type stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Map,
}

impl CollectionKind {
    pub fn empty(self) -> Value {
        match self {
            CollectionKind::List => Value::empty_list(),
            CollectionKind::Map => Value::empty_map(),
        }
    }
}

const LIST_TYPES: &[&str] = &["List", "ArrayList", "LinkedList", "Collection", "Iterable"];
const MAP_TYPES: &[&str] = &["Map", "HashMap", "TreeMap", "LinkedHashMap"];
const CONSTRUCTIBLE: &[&str] = &["ArrayList", "LinkedList", "HashMap", "TreeMap", "LinkedHashMap"];

/// Strip generic arguments and package qualifiers: `java.util.List<String>` → `List`
pub fn simple_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name).trim();
    base.rsplit('.').next().unwrap_or(base).trim()
}

/// Collection kind of a declared type, if it is a list or map type
pub fn collection_kind(type_name: &str) -> Option<CollectionKind> {
    let name = simple_type_name(type_name);
    if LIST_TYPES.contains(&name) {
        Some(CollectionKind::List)
    } else if MAP_TYPES.contains(&name) {
        Some(CollectionKind::Map)
    } else {
        None
    }
}

/// `new T<...>()` for the known concrete collection classes
pub fn construct(type_name: &str) -> Option<Value> {
    let name = simple_type_name(type_name);
    if CONSTRUCTIBLE.contains(&name) {
        collection_kind(name).map(CollectionKind::empty)
    } else {
        None
    }
}

/// Zero-argument member call from the allow-list, dispatched on the
/// receiver's runtime type
pub fn call_method(receiver: &Value, name: &str) -> Option<Value> {
    match (receiver, name) {
        (Value::Text(s), "toUpperCase") => Some(Value::Text(s.to_uppercase())),
        (Value::Text(s), "toLowerCase") => Some(Value::Text(s.to_lowercase())),
        // Java string length counts UTF-16 code units
        (Value::Text(s), "length") => i32::try_from(s.encode_utf16().count()).ok().map(Value::Int),
        (Value::List(items), "size" | "length") => i32::try_from(items.len()).ok().map(Value::Int),
        (Value::Map(entries), "size") => i32::try_from(entries.len()).ok().map(Value::Int),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_kinds() {
        assert_eq!(collection_kind("List<String>"), Some(CollectionKind::List));
        assert_eq!(collection_kind("java.util.HashMap<String, Integer>"), Some(CollectionKind::Map));
        assert_eq!(collection_kind("String"), None);
        assert_eq!(construct("ArrayList"), Some(Value::empty_list()));
        // Interfaces cannot be instantiated
        assert_eq!(construct("List"), None);
    }

    #[test]
    fn test_allow_list() {
        let s = Value::text("héllo");
        assert_eq!(call_method(&s, "toUpperCase"), Some(Value::text("HÉLLO")));
        assert_eq!(call_method(&s, "length"), Some(Value::Int(5)));
        assert_eq!(call_method(&Value::text("😀"), "length"), Some(Value::Int(2)));
        assert_eq!(call_method(&Value::List(vec![Value::Int(1)]), "size"), Some(Value::Int(1)));
        assert_eq!(call_method(&s, "trim"), None);
        assert_eq!(call_method(&Value::Int(3), "length"), None);
    }
}
