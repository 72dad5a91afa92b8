//! Schema declaration: an ordered, duplicate-free field list bound to
//! primitive or nested record types.
//!
//! A schema is static data built once per record kind and shared via `Arc`.
//! Arc identity is type identity: two structurally identical schemas are
//! distinct types for assignment purposes (instance equality stays
//! structural, see `record`).

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StructError;
use crate::types::PrimType;
use crate::value::Value;

/// Field type: a primitive descriptor or a reference to another schema.
/// Every consumer (validate, pack, unpack, size) dispatches on this tag.
#[derive(Debug, Clone)]
pub enum FieldType {
    Prim(PrimType),
    Nested(Arc<Schema>),
}

impl FieldType {
    pub fn size(&self) -> usize {
        match self {
            FieldType::Prim(p) => p.size(),
            FieldType::Nested(s) => s.size(),
        }
    }

    pub fn is_padding(&self) -> bool {
        matches!(self, FieldType::Prim(PrimType::Padding(_)))
    }

    /// Validate a candidate value, returning the canonical stored form.
    /// Nested fields require an instance of the exact nested schema type.
    pub fn validate(&self, value: Value) -> Result<Value, StructError> {
        match self {
            FieldType::Prim(p) => p.validate(value),
            FieldType::Nested(schema) => match value {
                Value::Struct(rec) if Arc::ptr_eq(rec.schema(), schema) => Ok(Value::Struct(rec)),
                Value::Struct(rec) => Err(StructError::TypeMismatch {
                    expected: format!("struct {}", schema.name()),
                    actual: format!("struct {}", rec.schema().name()),
                }),
                other => Err(StructError::TypeMismatch {
                    expected: format!("struct {}", schema.name()),
                    actual: other.kind_name().to_string(),
                }),
            },
        }
    }
}

impl From<PrimType> for FieldType {
    fn from(p: PrimType) -> FieldType {
        FieldType::Prim(p)
    }
}

impl From<Arc<Schema>> for FieldType {
    fn from(s: Arc<Schema>) -> FieldType {
        FieldType::Nested(s)
    }
}

impl From<&Arc<Schema>> for FieldType {
    fn from(s: &Arc<Schema>) -> FieldType {
        FieldType::Nested(s.clone())
    }
}

/// One declared field: name, type, optional default, optional doc comment
/// (carried over from header extraction).
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    pub default: Option<Value>,
    pub doc: Option<String>,
}

/// The static, ordered field-type declaration for one record kind.
#[derive(Debug)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
    size: usize,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Build a schema from an explicit field list, performing every
    /// definition-time check: duplicate names, array element shape, padding
    /// defaults, and validation of declared defaults (defaults fail exactly
    /// the way an explicit assignment would).
    pub fn from_fields(
        name: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<Arc<Schema>, StructError> {
        let name = name.into();
        let mut by_name = HashMap::with_capacity(fields.len());
        let mut checked = Vec::with_capacity(fields.len());
        let mut size = 0usize;
        for (idx, mut field) in fields.into_iter().enumerate() {
            if by_name.insert(field.name.clone(), idx).is_some() {
                return Err(StructError::DuplicateField(field.name));
            }
            if let FieldType::Prim(p) = &field.ty {
                p.check_well_formed()?;
            }
            if let Some(default) = field.default.take() {
                if field.ty.is_padding() {
                    return Err(StructError::BadDefault {
                        field: field.name,
                        source: Box::new(StructError::PaddingField),
                    });
                }
                let canonical = field.ty.validate(default).map_err(|e| StructError::BadDefault {
                    field: field.name.clone(),
                    source: Box::new(e),
                })?;
                field.default = Some(canonical);
            }
            size += field.ty.size();
            checked.push(field);
        }
        Ok(Arc::new(Schema {
            name,
            fields: checked,
            by_name,
            size,
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total packed byte size, computed from the schema alone.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|i| &self.fields[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }
}

/// Builder-style schema declaration: field order is declaration order and
/// becomes both the byte layout and the projection order.
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty: ty.into(),
            default: None,
            doc: None,
        });
        self
    }

    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: impl Into<FieldType>,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty: ty.into(),
            default: Some(default.into()),
            doc: None,
        });
        self
    }

    /// All definition-time checks happen here, once per record kind.
    pub fn build(self) -> Result<Arc<Schema>, StructError> {
        Schema::from_fields(self.name, self.fields)
    }
}
