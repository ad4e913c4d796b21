pub mod codec;
pub mod coerce;
pub mod context;
pub mod datetime;
pub mod engine;
pub mod errors;
pub mod path;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod types;
pub mod value;
mod number;
mod parser;

use std::sync::Arc;

pub use codec::{JsonCodec, SerdeJsonCodec};
pub use coerce::{coerce_value, Coercer};
pub use context::{Context, Zone};
pub use datetime::{
    compare_dates, parse_date, parse_date_with_pattern, parse_date_with_system_zone,
    parse_date_with_utc_zone, DateKind, DateValue, Timestamp, ZonedDateTime,
};
pub use errors::{CoercionError, CoercionErrorKind, DecodeError, Error, PathError, ReflectError, Result};
pub use number::compare_numbers;
pub use path::{PathExpression, Segment};
pub use record::{find_field, read_field, DynamicRecord, FieldHandle, Record, RecordType};
pub use registry::TypeRegistry;
pub use resolver::{resolve_expr, resolve_path};
pub use types::{classify, EnumType, TypeBucket, TypeDescriptor};
pub use value::{EnumConstant, Value};

/// Resolves paths and coerces text with one configuration: the coercion
/// context, the codec used for structured targets, and the registry used to
/// look up target types by name.
#[derive(Clone)]
pub struct Engine {
    coercer: Coercer,
    registry: TypeRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Context::default())
    }
}

impl Engine {
    pub fn new(ctx: Context) -> Self {
        Self {
            coercer: Coercer::new(ctx),
            registry: TypeRegistry::with_builtins(),
        }
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn JsonCodec>) -> Self {
        self.coercer = self.coercer.with_codec(codec);
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    pub fn resolve(&self, root: &Value, path: &str) -> Result<Value> {
        Ok(resolve_path(root, path)?)
    }

    /// Decodes `json_str` with the engine's codec, then resolves `path`.
    pub fn resolve_json(&self, json_str: &str, path: &str) -> Result<Value> {
        let root = self.coercer.codec().decode(json_str, &TypeDescriptor::Any)?;
        self.resolve(&root, path)
    }

    pub fn coerce(&self, text: Option<&str>, target: &TypeDescriptor) -> Result<Value> {
        Ok(self.coercer.coerce(text, target)?)
    }

    /// Coerces into the type registered as `type_name`.
    pub fn coerce_named(&self, text: Option<&str>, type_name: &str) -> Result<Value> {
        let target = self
            .registry
            .get(type_name)
            .ok_or_else(|| Error::UnknownType(type_name.to_string()))?;
        self.coerce(text, &target)
    }

    pub fn encode(&self, value: &Value) -> String {
        self.coercer.codec().encode(value)
    }
}
