//! Record instances: validated construction and mutation, whole-record
//! pack/unpack, dictionary projection, and structural equality.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StructError;
use crate::schema::{FieldType, Schema};
use crate::types::PrimType;
use crate::value::Value;

/// A live record value bound to exactly one schema.
///
/// Construction applies declared defaults; every other non-padding field
/// starts unset and must be assigned (with full validation) before `pack`.
/// A failed assignment leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<Option<Value>>,
}

impl Record {
    /// New instance with declared defaults applied; all other fields unset.
    pub fn new(schema: &Arc<Schema>) -> Record {
        // Defaults were canonicalized when the schema was built.
        let values = schema.fields().iter().map(|f| f.default.clone()).collect();
        Record {
            schema: schema.clone(),
            values,
        }
    }

    /// New instance from explicit name/value pairs. Names absent from the
    /// schema fail with `UnknownField`; fields neither supplied nor
    /// defaulted are left unset and surface as `MissingField` at pack time.
    pub fn with_values<I, S>(schema: &Arc<Schema>, pairs: I) -> Result<Record, StructError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let mut rec = Record::new(schema);
        for (name, value) in pairs {
            rec.set(name.as_ref(), value)?;
        }
        Ok(rec)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Assign a field by name, re-validating against the field's declared
    /// type. Padding fields are never assignable. On error the stored value
    /// is unchanged.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), StructError> {
        let idx = self
            .schema
            .index_of(name)
            .ok_or_else(|| StructError::UnknownField(name.to_string()))?;
        let field = &self.schema.fields()[idx];
        if field.ty.is_padding() {
            return Err(StructError::PaddingField);
        }
        let canonical = field.ty.validate(value)?;
        self.values[idx] = Some(canonical);
        Ok(())
    }

    /// Current value of a field, or `None` if unset (or padding/unknown).
    pub fn get(&self, name: &str) -> Option<&Value> {
        let idx = self.schema.index_of(name)?;
        self.values[idx].as_ref()
    }

    /// True once every non-padding field holds a value.
    pub fn is_complete(&self) -> bool {
        self.schema
            .fields()
            .iter()
            .zip(&self.values)
            .all(|(f, v)| f.ty.is_padding() || v.is_some())
    }

    /// Serialize to the schema's fixed layout: fields in declared order,
    /// padding as zero bytes, nested records inline. Output length always
    /// equals `schema.size()`.
    pub fn pack(&self) -> Result<Vec<u8>, StructError> {
        let mut out = Vec::with_capacity(self.schema.size());
        for (field, slot) in self.schema.fields().iter().zip(&self.values) {
            match (&field.ty, slot.as_ref()) {
                (FieldType::Prim(PrimType::Padding(n)), _) => {
                    out.extend(std::iter::repeat(0u8).take(*n));
                }
                (_, None) => return Err(StructError::MissingField(field.name.clone())),
                (FieldType::Prim(p), Some(v)) => p.encode(v, &mut out)?,
                (FieldType::Nested(_), Some(Value::Struct(rec))) => {
                    out.extend_from_slice(&rec.pack()?);
                }
                (FieldType::Nested(s), Some(v)) => {
                    return Err(StructError::TypeMismatch {
                        expected: format!("struct {}", s.name()),
                        actual: v.kind_name().to_string(),
                    });
                }
            }
        }
        Ok(out)
    }

    /// Deserialize a byte buffer into a new, fully validated instance.
    /// Fails with `BufferLength` when the buffer is shorter than the
    /// schema's total size; trailing extra bytes are ignored. Decoded values
    /// go through the normal assignment path, so corrupt buffers fail here
    /// rather than producing invalid instances.
    pub fn unpack(schema: &Arc<Schema>, bytes: &[u8]) -> Result<Record, StructError> {
        if bytes.len() < schema.size() {
            return Err(StructError::BufferLength {
                need: schema.size(),
                got: bytes.len(),
            });
        }
        let mut rec = Record::new(schema);
        let mut offset = 0usize;
        for field in schema.fields() {
            let size = field.ty.size();
            let chunk = &bytes[offset..offset + size];
            match &field.ty {
                FieldType::Prim(p) => {
                    if let Some(v) = p.decode(chunk)? {
                        rec.set(&field.name, v)?;
                    }
                }
                FieldType::Nested(s) => {
                    let nested = Record::unpack(s, chunk)?;
                    rec.set(&field.name, Value::Struct(nested))?;
                }
            }
            offset += size;
        }
        Ok(rec)
    }

    /// Project to declared-order name/value pairs. Padding fields are always
    /// omitted, as are fields still unset; nested records stay `Value::Struct`
    /// and project recursively through their own `to_dict`.
    pub fn to_dict(&self) -> Vec<(String, Value)> {
        self.schema
            .fields()
            .iter()
            .zip(&self.values)
            .filter(|(f, _)| !f.ty.is_padding())
            .filter_map(|(f, v)| v.clone().map(|v| (f.name.clone(), v)))
            .collect()
    }
}

/// Structural (duck-typed) equality: two instances are equal iff their
/// projections hold the same name/value pairs, recursively. Schema identity
/// is deliberately irrelevant: independently declared but structurally
/// identical record types compare equal.
impl PartialEq for Record {
    fn eq(&self, other: &Record) -> bool {
        let a = self.to_dict();
        let b = other.to_dict();
        if a.len() != b.len() {
            return false;
        }
        let by_name: HashMap<&str, &Value> = b.iter().map(|(k, v)| (k.as_str(), v)).collect();
        a.iter()
            .all(|(k, v)| by_name.get(k.as_str()).map_or(false, |bv| *bv == v))
    }
}
