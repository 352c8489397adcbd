//! Record Decomposition Module
//!
//! Turns structured data into the `(field, value)` pairs written by `hmset`.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::cache::decompose::decompose;
use crate::cache::Value;
use crate::error::Result;

// == Record ==
/// Structured data that can be written to a hash bucket in one `hmset` call.
///
/// Implementors enumerate their own named attributes; no runtime reflection is
/// involved. Decomposition is shallow: each attribute becomes exactly one field.
pub trait Record {
    /// Consumes the record and returns one `(field name, value)` pair per attribute.
    fn into_fields(self) -> Result<Vec<(String, Value)>>;
}

impl<K, V, S> Record for HashMap<K, V, S>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> Result<Vec<(String, Value)>> {
        Ok(self.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V> Record for BTreeMap<K, V>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> Result<Vec<(String, Value)>> {
        Ok(self.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V> Record for Vec<(K, V)>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> Result<Vec<(String, Value)>> {
        Ok(self.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> Record for [(K, V); N]
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_fields(self) -> Result<Vec<(String, Value)>> {
        Ok(self.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// == Serialized ==
/// Adapter that decomposes any `Serialize` struct or map into hash fields.
///
/// The top-level shape must be a struct or map of named attributes. Primitive
/// attributes map straight to `Value` (non-finite floats included); nested
/// objects and arrays are stored whole as an opaque `serde_json::Value`.
///
/// # Example
/// ```
/// use serde::Serialize;
/// use swiftcache::{Cache, Serialized, NO_EXPIRY};
///
/// #[derive(Serialize)]
/// struct User { name: String, age: u32 }
///
/// let cache = Cache::new();
/// let user = User { name: "leoantony".into(), age: 25 };
/// cache.hmset("user", Serialized(&user), NO_EXPIRY).unwrap();
/// assert_eq!(cache.hget("user", "age").and_then(|v| v.as_int()), Some(25));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Serialized<T>(pub T);

impl<T: Serialize> Record for Serialized<T> {
    fn into_fields(self) -> Result<Vec<(String, Value)>> {
        decompose(&self.0)
    }
}
