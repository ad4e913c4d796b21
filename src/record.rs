//! Field lookup over record types.
//!
//! A [`RecordType`] lists the fields a type declares and optionally the type it
//! extends. Lookup walks from the type itself up through its ancestors and
//! stops at the end of the chain; the implicit universal root declares
//! nothing. Concrete values implement [`Record`] to hand out field values.

use std::collections::HashMap;
use std::fmt;
use std::iter;
use std::sync::Arc;

use crate::errors::ReflectError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    name: String,
    fields: Vec<String>,
    parent: Option<Arc<RecordType>>,
}

impl RecordType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            parent: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    pub fn with_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn extends(mut self, parent: Arc<RecordType>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_fields(&self) -> &[String] {
        &self.fields
    }

    pub fn parent(&self) -> Option<&Arc<RecordType>> {
        self.parent.as_ref()
    }

    /// This type followed by each ancestor, nearest first.
    pub fn ancestry(&self) -> impl Iterator<Item = &RecordType> {
        iter::successors(Some(self), |t| t.parent.as_deref())
    }

    /// Every readable field, with fields of derived types hiding ancestor
    /// fields of the same name.
    pub fn all_fields(&self) -> Vec<FieldHandle<'_>> {
        let mut out: Vec<FieldHandle<'_>> = Vec::new();
        for ty in self.ancestry() {
            for name in &ty.fields {
                if !out.iter().any(|h| h.name == name.as_str()) {
                    out.push(FieldHandle {
                        declared_in: ty,
                        name,
                    });
                }
            }
        }
        out
    }
}

/// A field located by [`find_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHandle<'t> {
    declared_in: &'t RecordType,
    name: &'t str,
}

impl<'t> FieldHandle<'t> {
    /// Name of the type that declares the field.
    pub fn owner(&self) -> &'t str {
        self.declared_in.name()
    }

    pub fn name(&self) -> &'t str {
        self.name
    }
}

/// A value that can be navigated by field name.
pub trait Record: fmt::Debug + Send + Sync {
    fn record_type(&self) -> &Arc<RecordType>;

    /// Value of `field`, or `None` if this instance refuses the read.
    /// Declared fields that hold nothing should yield `Some(Value::Null)`.
    fn read(&self, field: &FieldHandle<'_>) -> Option<Value>;
}

pub fn find_field<'t>(ty: &'t RecordType, name: &str) -> Option<FieldHandle<'t>> {
    ty.ancestry().find_map(|t| {
        t.fields.iter().find(|f| f.as_str() == name).map(|f| FieldHandle {
            declared_in: t,
            name: f,
        })
    })
}

pub fn read_field(handle: &FieldHandle<'_>, instance: &dyn Record) -> Result<Value, ReflectError> {
    instance
        .read(handle)
        .ok_or_else(|| ReflectError::Inaccessible {
            owner: handle.owner().to_string(),
            field: handle.name().to_string(),
        })
}

/// Record whose field values are held in a table keyed by declaring type.
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    ty: Arc<RecordType>,
    values: HashMap<(String, String), Value>,
}

impl DynamicRecord {
    pub fn new(ty: Arc<RecordType>) -> Self {
        Self {
            ty,
            values: HashMap::new(),
        }
    }

    /// Sets the field `name` resolves to, searching the type chain.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ReflectError> {
        let key = match find_field(&self.ty, name) {
            Some(h) => (h.owner().to_string(), h.name().to_string()),
            None => {
                return Err(ReflectError::NoSuchField {
                    type_name: self.ty.name().to_string(),
                    field: name.to_string(),
                })
            }
        };
        self.values.insert(key, value.into());
        Ok(())
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, ReflectError> {
        self.set(name, value)?;
        Ok(self)
    }
}

impl Record for DynamicRecord {
    fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    fn read(&self, field: &FieldHandle<'_>) -> Option<Value> {
        let key = (field.owner().to_string(), field.name().to_string());
        Some(self.values.get(&key).cloned().unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Arc<RecordType> {
        Arc::new(RecordType::new("Entity").with_fields(["id", "created"]))
    }

    fn order() -> Arc<RecordType> {
        Arc::new(
            RecordType::new("Order")
                .with_fields(["items", "created"])
                .extends(entity()),
        )
    }

    #[test]
    fn lookup_walks_ancestors() {
        let ty = order();
        let id = find_field(&ty, "id").unwrap();
        assert_eq!(id.owner(), "Entity");
        let items = find_field(&ty, "items").unwrap();
        assert_eq!(items.owner(), "Order");
        assert!(find_field(&ty, "missing").is_none());
    }

    #[test]
    fn derived_field_shadows_ancestor() {
        let ty = order();
        assert_eq!(find_field(&ty, "created").unwrap().owner(), "Order");
        let names: Vec<_> = ty.all_fields().iter().map(|h| h.name()).collect();
        assert_eq!(names, ["items", "created", "id"]);
    }

    #[test]
    fn unset_fields_read_as_null() {
        let rec = DynamicRecord::new(order()).with("id", 7).unwrap();
        let ty = rec.record_type().clone();
        let id = find_field(&ty, "id").unwrap();
        assert_eq!(read_field(&id, &rec).unwrap(), Value::Int(7));
        let items = find_field(&ty, "items").unwrap();
        assert_eq!(read_field(&items, &rec).unwrap(), Value::Null);
    }

    #[test]
    fn setting_undeclared_field_fails() {
        let err = DynamicRecord::new(order()).with("nope", 1).unwrap_err();
        assert!(matches!(err, ReflectError::NoSuchField { .. }));
    }

    #[derive(Debug)]
    struct Sealed(Arc<RecordType>);

    impl Record for Sealed {
        fn record_type(&self) -> &Arc<RecordType> {
            &self.0
        }

        fn read(&self, _field: &FieldHandle<'_>) -> Option<Value> {
            None
        }
    }

    #[test]
    fn refused_read_is_inaccessible() {
        let sealed = Sealed(entity());
        let ty = sealed.record_type().clone();
        let id = find_field(&ty, "id").unwrap();
        assert_eq!(
            read_field(&id, &sealed),
            Err(ReflectError::Inaccessible {
                owner: "Entity".into(),
                field: "id".into()
            })
        );
    }
}
