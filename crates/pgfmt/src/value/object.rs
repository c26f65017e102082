use super::Value;
use indexmap::IndexMap;
use std::sync::Arc;

/// An insertion-ordered property bag.
///
/// Besides its own fields an object may extend a shared *base* object. Lookups
/// (`get`, `contains`) fall through to the base; enumeration (`keys`, `iter`)
/// only sees own fields unless [`Object::all_keys`] is used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    fields: IndexMap<String, Value>,
    base: Option<Arc<Object>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object inheriting the fields of `base`.
    pub fn extending(base: impl Into<Arc<Object>>) -> Self {
        Self {
            fields: IndexMap::new(),
            base: Some(base.into()),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Look a property up, falling through to inherited fields.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key) {
            Some(v) => Some(v),
            None => self.base.as_deref().and_then(|b| b.get(key)),
        }
    }

    pub fn get_own(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// `true` when the property exists here or in the base chain.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn base(&self) -> Option<&Object> {
        self.base.as_deref()
    }

    /// Own keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Own values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Own keys followed by inherited keys that are not shadowed.
    pub fn all_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys().collect();
        let mut base = self.base.as_deref();
        while let Some(b) = base {
            for k in b.keys() {
                if !keys.contains(&k) {
                    keys.push(k);
                }
            }
            base = b.base.as_deref();
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            base: None,
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Object {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherited_lookup_and_enumeration() {
        let base = Object::new().with("a", 1).with("b", 2);
        let obj = Object::extending(base).with("b", 20).with("c", 3);

        assert_eq!(obj.get("a"), Some(&Value::Int(1)));
        assert_eq!(obj.get("b"), Some(&Value::Int(20)));
        assert!(obj.contains("a"));
        assert!(!obj.has_own("a"));
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(obj.all_keys(), vec!["b", "c", "a"]);
    }

    #[test]
    fn preserves_insertion_order() {
        let obj = Object::from([("z", 1), ("a", 2), ("m", 3)]);
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }
}
