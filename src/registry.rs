use std::collections::HashMap;
use std::sync::Arc;

use crate::record::RecordType;
use crate::types::{EnumType, TypeDescriptor};

/// Thread-safe registry of type names, for callers that receive the target
/// type as text.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    inner: Arc<HashMap<String, TypeDescriptor>>,
}

const BUILTINS: &[TypeDescriptor] = &[
    TypeDescriptor::Void,
    TypeDescriptor::Bool,
    TypeDescriptor::Byte,
    TypeDescriptor::Short,
    TypeDescriptor::Int,
    TypeDescriptor::Long,
    TypeDescriptor::BigInteger,
    TypeDescriptor::Float,
    TypeDescriptor::Double,
    TypeDescriptor::BigDecimal,
    TypeDescriptor::Char,
    TypeDescriptor::String,
    TypeDescriptor::LocalDate,
    TypeDescriptor::LocalDateTime,
    TypeDescriptor::ZonedDateTime,
    TypeDescriptor::Instant,
    TypeDescriptor::Timestamp,
    TypeDescriptor::List,
    TypeDescriptor::Map,
    TypeDescriptor::Any,
];

const ALIASES: &[(&str, &str)] = &[
    ("boolean", "bool"),
    ("integer", "int"),
    ("character", "char"),
    ("str", "string"),
    ("date", "local_date"),
    ("datetime", "local_date_time"),
    ("object", "any"),
];

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut map: HashMap<String, TypeDescriptor> = HashMap::new();
        for ty in BUILTINS {
            if let Some(name) = ty.builtin_name() {
                map.insert(name.to_string(), ty.clone());
            }
        }
        for (alias, target) in ALIASES {
            if let Some(ty) = map.get(*target).cloned() {
                map.insert(alias.to_string(), ty);
            }
        }
        Self { inner: Arc::new(map) }
    }

    pub fn register(&mut self, name: impl Into<String>, ty: TypeDescriptor) {
        let mut_map = Arc::make_mut(&mut self.inner);
        mut_map.insert(name.into(), ty);
    }

    /// Registers an enum under its own name.
    pub fn register_enum(&mut self, enum_type: EnumType) -> TypeDescriptor {
        let name = enum_type.name.clone();
        let ty = TypeDescriptor::Enum(Arc::new(enum_type));
        self.register(name, ty.clone());
        ty
    }

    /// Registers a record type under its own name.
    pub fn register_record(&mut self, record_type: Arc<RecordType>) -> TypeDescriptor {
        let name = record_type.name().to_string();
        let ty = TypeDescriptor::Record(record_type);
        self.register(name, ty.clone());
        ty
    }

    pub fn get(&self, name: &str) -> Option<TypeDescriptor> {
        self.inner.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_and_aliases() {
        let reg = TypeRegistry::with_builtins();
        assert_eq!(reg.get("int"), Some(TypeDescriptor::Int));
        assert_eq!(reg.get("integer"), Some(TypeDescriptor::Int));
        assert_eq!(reg.get("zoned_date_time"), Some(TypeDescriptor::ZonedDateTime));
        assert_eq!(reg.get("Color"), None);
    }

    #[test]
    fn registered_types_are_copy_on_write() {
        let base = TypeRegistry::with_builtins();
        let mut reg = base.clone();
        let color = reg.register_enum(EnumType::new("Color", ["RED"]));
        assert_eq!(reg.get("Color"), Some(color));
        assert_eq!(base.get("Color"), None);

        let order = reg.register_record(Arc::new(RecordType::new("Order")));
        assert_eq!(reg.get("Order"), Some(order));
        assert!(reg.names().contains(&"Order"));
    }
}
