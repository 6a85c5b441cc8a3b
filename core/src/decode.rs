//! Tolerant field access over parsed JSON.
//!
//! The service omits fields it has nothing to say about and its schema
//! drifts between API versions, so every entity field is read through
//! `EntityReader`. A missing or `null` field is absent. A field of the wrong
//! type is logged and also treated as absent. Neither aborts decoding of the
//! rest of the entity or of the list it sits in.

use serde_json::{Map, Value};
use tracing::warn;

/// Outcome of looking up one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Present(T),
    Absent,
    Mismatch { expected: &'static str },
}

impl<T> Field<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Absent | Field::Mismatch { .. } => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }
}

/// A scalar type a field can be read as.
pub trait FromField: Sized {
    const KIND: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromField for String {
    const KIND: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromField for i64 {
    const KIND: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromField for f64 {
    const KIND: &'static str = "number";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromField for bool {
    const KIND: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            // Older methods report flags as 0/1.
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A record decoded from a JSON object.
pub trait Entity: Sized {
    /// Name used in log events.
    const NAME: &'static str;

    fn decode(reader: &EntityReader<'_>) -> Self;
}

/// Read-only view of a JSON object that may itself be absent.
#[derive(Debug, Clone, Copy)]
pub struct EntityReader<'a> {
    entity: &'static str,
    object: Option<&'a Map<String, Value>>,
}

impl<'a> EntityReader<'a> {
    /// `value` that is missing, `null` or not an object yields a reader on
    /// which every field is absent.
    pub fn new(entity: &'static str, value: Option<&'a Value>) -> Self {
        let object = match value {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                warn!(entity, "expected a JSON object; treating as absent");
                None
            }
        };
        Self { entity, object }
    }

    pub fn is_present(&self) -> bool {
        self.object.is_some()
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        match self.object?.get(name)? {
            Value::Null => None,
            value => Some(value),
        }
    }

    pub fn field<T: FromField>(&self, name: &str) -> Field<T> {
        let Some(value) = self.lookup(name) else {
            return Field::Absent;
        };
        match T::from_value(value) {
            Some(v) => Field::Present(v),
            None => {
                warn!(entity = self.entity, field = name, expected = T::KIND, "field has unexpected type; treating as absent");
                Field::Mismatch { expected: T::KIND }
            }
        }
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.field(name).into_option()
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.field(name).into_option()
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.field(name).into_option()
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.field(name).into_option()
    }

    /// The untyped value, for fields whose shape varies.
    pub fn raw(&self, name: &str) -> Option<&'a Value> {
        self.lookup(name)
    }

    /// Reader over a nested object.
    pub fn child(&self, entity: &'static str, name: &str) -> EntityReader<'a> {
        EntityReader::new(entity, self.lookup(name))
    }

    /// A nested entity, or `None` when the field is absent or not an object.
    pub fn entity<E: Entity>(&self, name: &str) -> Option<E> {
        let reader = self.child(E::NAME, name);
        reader.is_present().then(|| E::decode(&reader))
    }

    /// Every object element of an array field. Non-object elements are
    /// skipped; a field that is not an array yields an empty list.
    pub fn entities<E: Entity>(&self, name: &str) -> Vec<E> {
        let Some(value) = self.lookup(name) else {
            return Vec::new();
        };
        let Some(items) = value.as_array() else {
            warn!(entity = self.entity, field = name, expected = "array", "field has unexpected type; treating as empty");
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| {
                if !item.is_object() {
                    warn!(entity = E::NAME, "skipping non-object list element");
                    return None;
                }
                Some(E::decode(&EntityReader::new(E::NAME, Some(item))))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Thing {
        id: Option<i64>,
        name: Option<String>,
    }

    impl Entity for Thing {
        const NAME: &'static str = "Thing";

        fn decode(reader: &EntityReader<'_>) -> Self {
            Self {
                id: reader.int("id"),
                name: reader.string("Name"),
            }
        }
    }

    #[test]
    fn present_fields_decode() {
        let v = json!({"id": 7, "Name": "x", "Rate": 2.5, "Public": true});
        let r = EntityReader::new("Thing", Some(&v));
        assert_eq!(r.int("id"), Some(7));
        assert_eq!(r.string("Name").as_deref(), Some("x"));
        assert_eq!(r.float("Rate"), Some(2.5));
        assert_eq!(r.bool("Public"), Some(true));
    }

    #[test]
    fn missing_and_null_are_absent() {
        let v = json!({"Name": null});
        let r = EntityReader::new("Thing", Some(&v));
        assert_eq!(r.field::<String>("Name"), Field::Absent);
        assert_eq!(r.field::<i64>("id"), Field::Absent);
    }

    #[test]
    fn absent_object_is_absent_everywhere() {
        let r = EntityReader::new("Thing", None);
        assert!(!r.is_present());
        assert_eq!(r.string("Name"), None);
        assert!(r.entities::<Thing>("Things").is_empty());
    }

    #[test]
    fn mismatch_is_reported_then_absent() {
        let v = json!({"id": "seven"});
        let r = EntityReader::new("Thing", Some(&v));
        assert_eq!(r.field::<i64>("id"), Field::Mismatch { expected: "integer" });
        assert_eq!(r.int("id"), None);
    }

    #[test]
    fn integer_reads_as_float() {
        let v = json!({"Hits": 12});
        let r = EntityReader::new("Thing", Some(&v));
        assert_eq!(r.float("Hits"), Some(12.0));
    }

    #[test]
    fn zero_one_read_as_bool() {
        let v = json!({"a": 0, "b": 1, "c": 2});
        let r = EntityReader::new("Thing", Some(&v));
        assert_eq!(r.bool("a"), Some(false));
        assert_eq!(r.bool("b"), Some(true));
        assert_eq!(r.bool("c"), None);
    }

    #[test]
    fn bad_list_element_does_not_abort_list() {
        let v = json!({"Things": [{"id": 1}, 5, {"id": "bad", "Name": "n"}]});
        let r = EntityReader::new("root", Some(&v));
        let things: Vec<Thing> = r.entities("Things");
        assert_eq!(
            things,
            vec![
                Thing { id: Some(1), name: None },
                Thing { id: None, name: Some("n".to_string()) },
            ]
        );
    }

    #[test]
    fn non_array_list_is_empty() {
        let v = json!({"Things": {"id": 1}});
        let r = EntityReader::new("root", Some(&v));
        assert!(r.entities::<Thing>("Things").is_empty());
    }

    #[test]
    fn nested_entity_requires_object() {
        let v = json!({"Thing": {"id": 3}, "Other": "text"});
        let r = EntityReader::new("root", Some(&v));
        assert_eq!(r.entity::<Thing>("Thing"), Some(Thing { id: Some(3), name: None }));
        assert_eq!(r.entity::<Thing>("Other"), None);
        assert_eq!(r.entity::<Thing>("Missing"), None);
    }
}
