use super::RecordSchema;
use crate::error::MapperResult;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A fully populated record bound to a [`RecordSchema`].
///
/// Holds exactly one value per declared field, in declaration order. Built only
/// through [`RecordSchema::instantiate`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct RecordInstance {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

impl RecordInstance {
    pub(super) fn new(schema: Arc<RecordSchema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Field values in declaration order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Value of the field `name`, if the schema declares it.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|idx| &self.values[idx])
    }

    /// `(field name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema.field_names().zip(self.values.iter())
    }

    /// See [`RecordSchema::table_ddl`].
    pub fn table_ddl(&self) -> MapperResult<String> {
        self.schema.table_ddl()
    }

    /// The record as a JSON object keyed by field name.
    pub fn to_json(&self) -> serde_json::Value {
        self.iter()
            .map(|(name, value)| {
                let json = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
                (name.to_string(), json)
            })
            .collect::<serde_json::Map<_, _>>()
            .into()
    }
}

/// Positional comparison: two records are equal when their values match in
/// declaration order, whatever schema they were built from.
impl PartialEq for RecordInstance {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Display for RecordInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.model_name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}
