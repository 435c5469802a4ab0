use super::RecordInstance;
use crate::error::{MapperError, MapperResult};
use crate::value::Value;
use std::sync::Arc;

/// A declared field: its name and an opaque column type marker.
///
/// The type marker only feeds generated DDL; values are never checked against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    type_marker: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_marker: type_marker.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_marker(&self) -> &str {
        &self.type_marker
    }
}

/// Static description of a composite record.
///
/// Immutable once built; shared by every instance and every rewrite that
/// touches one through `Arc<RecordSchema>`.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordSchema {
    model_name: String,
    table_name: Option<String>,
    fields: Vec<FieldDescriptor>,
    extra_ddl: Option<String>,
    require_all_fields: bool,
}

impl RecordSchema {
    /// Start declaring a schema for the model `model_name`.
    pub fn builder(model_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            model_name: model_name.into(),
            table_name: None,
            fields: Vec::new(),
            extra_ddl: None,
            require_all_fields: false,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn extra_ddl(&self) -> Option<&str> {
        self.extra_ddl.as_deref()
    }

    /// Whether instances must set every declared field.
    pub fn requires_all_fields(&self) -> bool {
        self.require_all_fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::name)
    }

    /// Declaration index of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build an instance from positional values followed by named values.
    ///
    /// Positional values fill fields in declaration order. Named values are then
    /// merged in; a name that is not declared, or that a positional value already
    /// filled, fails the whole call. Fields left unset become [`Value::Null`],
    /// unless the schema was declared with
    /// [`require_all_fields`](SchemaBuilder::require_all_fields), in which case
    /// the call fails with [`MapperError::MissingField`].
    pub fn instantiate<I, N, K, V>(
        self: &Arc<Self>,
        ordered: I,
        named: N,
    ) -> MapperResult<RecordInstance>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
        N: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let declared = self.fields.len();
        let mut slots: Vec<Option<Value>> = vec![None; declared];

        let mut given = 0;
        for value in ordered {
            if given < declared {
                slots[given] = Some(value.into());
            }
            given += 1;
        }
        if given > declared {
            return Err(MapperError::TooManyOrderedFields {
                model_name: self.model_name.clone(),
                given,
                actual: declared,
            });
        }

        for (name, value) in named {
            let name = name.as_ref();
            let idx = self
                .position(name)
                .ok_or_else(|| MapperError::UnknownField(name.to_string()))?;
            if slots[idx].is_some() {
                return Err(MapperError::FieldAlreadyTaken(name.to_string()));
            }
            slots[idx] = Some(value.into());
        }

        if self.require_all_fields
            && let Some(idx) = slots.iter().position(Option::is_none)
        {
            return Err(MapperError::MissingField {
                model_name: self.model_name.clone(),
                field: self.fields[idx].name.clone(),
            });
        }

        let values = slots.into_iter().map(Option::unwrap_or_default).collect();
        Ok(RecordInstance::new(Arc::clone(self), values))
    }

    /// Build an instance from positional values only.
    pub fn from_ordered<I>(self: &Arc<Self>, ordered: I) -> MapperResult<RecordInstance>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.instantiate(ordered, std::iter::empty::<(&str, Value)>())
    }

    /// Build an instance from named values only.
    pub fn from_named<N, K, V>(self: &Arc<Self>, named: N) -> MapperResult<RecordInstance>
    where
        N: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.instantiate(std::iter::empty::<Value>(), named)
    }

    /// Render `CREATE TABLE IF NOT EXISTS <table> (<field> <type>,...[,<extra>])`.
    pub fn table_ddl(&self) -> MapperResult<String> {
        let table = self.table_name.as_deref().ok_or_else(|| {
            MapperError::TablenameNotSpecifiedOnTableCreation(self.model_name.clone())
        })?;

        let mut columns: Vec<String> = self
            .fields
            .iter()
            .map(|f| {
                if f.type_marker.is_empty() {
                    f.name.clone()
                } else {
                    format!("{} {}", f.name, f.type_marker)
                }
            })
            .collect();
        if let Some(extra) = self.extra_ddl.as_deref().filter(|s| !s.is_empty()) {
            columns.push(extra.to_string());
        }

        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {table} ({})",
            columns.join(",")
        ))
    }
}

impl AsRef<RecordSchema> for RecordSchema {
    fn as_ref(&self) -> &RecordSchema {
        self
    }
}

/// Builder returned by [`RecordSchema::builder`].
#[must_use]
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    model_name: String,
    table_name: Option<String>,
    fields: Vec<FieldDescriptor>,
    extra_ddl: Option<String>,
    require_all_fields: bool,
}

impl SchemaBuilder {
    /// Set the table the model maps to.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Declare the next field with its column type marker.
    pub fn field(mut self, name: impl Into<String>, type_marker: impl Into<String>) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_marker));
        self
    }

    /// Declare the next field without a type marker.
    ///
    /// Useful for result-only models that are never turned into tables.
    pub fn untyped_field(self, name: impl Into<String>) -> Self {
        self.field(name, "")
    }

    /// Clause appended verbatim to the generated `CREATE TABLE` column list.
    pub fn extra_ddl(mut self, ddl: impl Into<String>) -> Self {
        self.extra_ddl = Some(ddl.into());
        self
    }

    /// Reject instances that leave any field unset.
    pub fn require_all_fields(mut self) -> Self {
        self.require_all_fields = true;
        self
    }

    /// Finish the declaration.
    pub fn build(self) -> MapperResult<Arc<RecordSchema>> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(MapperError::DuplicateField {
                    model_name: self.model_name,
                    field: field.name.clone(),
                });
            }
        }

        Ok(Arc::new(RecordSchema {
            model_name: self.model_name,
            table_name: self.table_name,
            fields: self.fields,
            extra_ddl: self.extra_ddl,
            require_all_fields: self.require_all_fields,
        }))
    }
}
