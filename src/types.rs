//! Primitive type registry: fixed size, validation rule, and little-endian
//! codec for every scalar, char-buffer, padding, and fixed-array kind.
//!
//! Validation and encoding are separate so the struct engine can enforce
//! contracts on every assignment instead of deferring them to pack time.
//! `validate` also canonicalizes: it returns the exact representation the
//! instance stores, which is the representation `decode` reproduces, so
//! `decode(encode(v)) == v` for every accepted value.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::StructError;
use crate::value::Value;

/// One scalar or fixed-size compound primitive kind.
///
/// Every kind has a byte width known at schema-definition time:
/// `CharArray(n)` and `Padding(n)` occupy `n` bytes, `Array(k, n)` occupies
/// `n * k.size()`, everything else its natural width.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimType {
    Bool,
    /// Single byte holding one character (U+0000..=U+00FF).
    Char,
    /// Fixed-capacity string buffer, NUL-padded on encode; decode strips
    /// trailing NUL bytes only, so trailing spaces survive a round trip.
    CharArray(usize),
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// Reserved layout space: encodes as zero bytes, never holds a value,
    /// never appears in a projected dictionary.
    Padding(usize),
    /// Exactly `n` homogeneous elements, `n` fixed at schema definition.
    Array(Box<PrimType>, usize),
}

impl PrimType {
    /// Checked fixed-array constructor. `Char` elements are rejected here,
    /// at definition time (use [`PrimType::CharArray`] for strings), as is
    /// `Padding`, which has no per-element value.
    pub fn array(elem: PrimType, len: usize) -> Result<PrimType, StructError> {
        let ty = PrimType::Array(Box::new(elem), len);
        ty.check_well_formed()?;
        Ok(ty)
    }

    /// Definition-time shape check, applied to every field type when a
    /// schema is built (the enum is public, so arrays can be constructed
    /// without going through [`PrimType::array`]).
    pub(crate) fn check_well_formed(&self) -> Result<(), StructError> {
        if let PrimType::Array(elem, _) = self {
            match elem.as_ref() {
                PrimType::Char => return Err(StructError::CharArrayElement),
                PrimType::Padding(_) => return Err(StructError::BadArrayElement("padding")),
                other => other.check_well_formed()?,
            }
        }
        Ok(())
    }

    /// Encoded byte width. Constant for the lifetime of the descriptor.
    pub fn size(&self) -> usize {
        match self {
            PrimType::Bool | PrimType::Char | PrimType::I8 | PrimType::U8 => 1,
            PrimType::I16 | PrimType::U16 => 2,
            PrimType::I32 | PrimType::U32 | PrimType::F32 => 4,
            PrimType::I64 | PrimType::U64 | PrimType::F64 => 8,
            PrimType::CharArray(n) | PrimType::Padding(n) => *n,
            PrimType::Array(elem, n) => elem.size() * n,
        }
    }

    /// Kind name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            PrimType::Bool => "bool",
            PrimType::Char => "char",
            PrimType::CharArray(_) => "char array",
            PrimType::I8 => "i8",
            PrimType::U8 => "u8",
            PrimType::I16 => "i16",
            PrimType::U16 => "u16",
            PrimType::I32 => "i32",
            PrimType::U32 => "u32",
            PrimType::I64 => "i64",
            PrimType::U64 => "u64",
            PrimType::F32 => "f32",
            PrimType::F64 => "f64",
            PrimType::Padding(_) => "padding",
            PrimType::Array(_, _) => "array",
        }
    }

    fn int_bounds(&self) -> Option<(i128, i128)> {
        Some(match self {
            PrimType::I8 => (i8::MIN as i128, i8::MAX as i128),
            PrimType::U8 => (0, u8::MAX as i128),
            PrimType::I16 => (i16::MIN as i128, i16::MAX as i128),
            PrimType::U16 => (0, u16::MAX as i128),
            PrimType::I32 => (i32::MIN as i128, i32::MAX as i128),
            PrimType::U32 => (0, u32::MAX as i128),
            PrimType::I64 => (i64::MIN as i128, i64::MAX as i128),
            PrimType::U64 => (0, u64::MAX as i128),
            _ => return None,
        })
    }

    fn is_signed(&self) -> bool {
        matches!(
            self,
            PrimType::I8 | PrimType::I16 | PrimType::I32 | PrimType::I64
        )
    }

    /// Validate `value` against this kind and return the canonical stored
    /// form: signed integer kinds store `Int`, unsigned store `Uint`, `F32`
    /// narrows wider input, one-character strings collapse to `Char`, and
    /// array elements are canonicalized recursively.
    pub fn validate(&self, value: Value) -> Result<Value, StructError> {
        if let Some((min, max)) = self.int_bounds() {
            let raw: i128 = match &value {
                Value::Int(v) => *v as i128,
                Value::Uint(v) => *v as i128,
                other => return Err(mismatch("integer", other)),
            };
            if raw < min || raw > max {
                return Err(StructError::Range {
                    ty: self.name(),
                    value: raw,
                    min,
                    max,
                });
            }
            return Ok(if self.is_signed() {
                Value::Int(raw as i64)
            } else {
                Value::Uint(raw as u64)
            });
        }
        match self {
            PrimType::Bool => match value {
                Value::Bool(_) => Ok(value),
                other => Err(mismatch("bool", &other)),
            },
            PrimType::Char => match value {
                Value::Char(c) => validate_char(c),
                Value::Str(s) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => validate_char(c),
                        _ => Err(StructError::TypeMismatch {
                            expected: "single character".to_string(),
                            actual: format!("string of length {}", s.chars().count()),
                        }),
                    }
                }
                other => Err(mismatch("char", &other)),
            },
            PrimType::CharArray(n) => match value {
                Value::Str(s) => {
                    if s.len() > *n {
                        Err(StructError::ArraySize {
                            expected: *n,
                            actual: s.len(),
                        })
                    } else {
                        Ok(Value::Str(s))
                    }
                }
                other => Err(mismatch("string", &other)),
            },
            PrimType::F32 => match value {
                Value::F32(_) => Ok(value),
                Value::F64(v) => Ok(Value::F32(v as f32)),
                Value::Int(v) => Ok(Value::F32(v as f32)),
                Value::Uint(v) => Ok(Value::F32(v as f32)),
                other => Err(mismatch("number", &other)),
            },
            PrimType::F64 => match value {
                Value::F64(_) => Ok(value),
                Value::F32(v) => Ok(Value::F64(v as f64)),
                Value::Int(v) => Ok(Value::F64(v as f64)),
                Value::Uint(v) => Ok(Value::F64(v as f64)),
                other => Err(mismatch("number", &other)),
            },
            PrimType::Padding(_) => Err(StructError::PaddingField),
            PrimType::Array(elem, n) => match value {
                Value::List(items) => {
                    if items.len() != *n {
                        return Err(StructError::ArraySize {
                            expected: *n,
                            actual: items.len(),
                        });
                    }
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(elem.validate(item)?);
                    }
                    Ok(Value::List(out))
                }
                other => Err(mismatch("list", &other)),
            },
            // Integer kinds are handled by the bounds check above.
            _ => Err(mismatch("integer", &value)),
        }
    }

    /// Append the fixed-width little-endian encoding of a validated value.
    /// Total for every value `validate` accepts.
    pub fn encode(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), StructError> {
        match self {
            PrimType::Bool => {
                let b = value.as_bool().ok_or_else(|| mismatch("bool", value))?;
                out.push(u8::from(b));
            }
            PrimType::Char => {
                let c = value.as_char().ok_or_else(|| mismatch("char", value))?;
                out.push(c as u8);
            }
            PrimType::CharArray(n) => {
                let s = value.as_str().ok_or_else(|| mismatch("string", value))?;
                if s.len() > *n {
                    return Err(StructError::ArraySize {
                        expected: *n,
                        actual: s.len(),
                    });
                }
                out.extend_from_slice(s.as_bytes());
                out.extend(std::iter::repeat(0u8).take(n - s.len()));
            }
            PrimType::I8 => {
                let v = value.as_i64().ok_or_else(|| mismatch("integer", value))?;
                out.push(v as i8 as u8);
            }
            PrimType::U8 => {
                let v = value.as_u64().ok_or_else(|| mismatch("integer", value))?;
                out.push(v as u8);
            }
            PrimType::I16 => {
                let v = value.as_i64().ok_or_else(|| mismatch("integer", value))?;
                let mut buf = [0u8; 2];
                LittleEndian::write_i16(&mut buf, v as i16);
                out.extend_from_slice(&buf);
            }
            PrimType::U16 => {
                let v = value.as_u64().ok_or_else(|| mismatch("integer", value))?;
                let mut buf = [0u8; 2];
                LittleEndian::write_u16(&mut buf, v as u16);
                out.extend_from_slice(&buf);
            }
            PrimType::I32 => {
                let v = value.as_i64().ok_or_else(|| mismatch("integer", value))?;
                let mut buf = [0u8; 4];
                LittleEndian::write_i32(&mut buf, v as i32);
                out.extend_from_slice(&buf);
            }
            PrimType::U32 => {
                let v = value.as_u64().ok_or_else(|| mismatch("integer", value))?;
                let mut buf = [0u8; 4];
                LittleEndian::write_u32(&mut buf, v as u32);
                out.extend_from_slice(&buf);
            }
            PrimType::I64 => {
                let v = value.as_i64().ok_or_else(|| mismatch("integer", value))?;
                let mut buf = [0u8; 8];
                LittleEndian::write_i64(&mut buf, v);
                out.extend_from_slice(&buf);
            }
            PrimType::U64 => {
                let v = value.as_u64().ok_or_else(|| mismatch("integer", value))?;
                let mut buf = [0u8; 8];
                LittleEndian::write_u64(&mut buf, v);
                out.extend_from_slice(&buf);
            }
            PrimType::F32 => {
                let v = value.as_f32().ok_or_else(|| mismatch("number", value))?;
                let mut buf = [0u8; 4];
                LittleEndian::write_f32(&mut buf, v);
                out.extend_from_slice(&buf);
            }
            PrimType::F64 => {
                let v = value.as_f64().ok_or_else(|| mismatch("number", value))?;
                let mut buf = [0u8; 8];
                LittleEndian::write_f64(&mut buf, v);
                out.extend_from_slice(&buf);
            }
            PrimType::Padding(n) => {
                out.extend(std::iter::repeat(0u8).take(*n));
            }
            PrimType::Array(elem, n) => {
                let items = value.as_list().ok_or_else(|| mismatch("list", value))?;
                if items.len() != *n {
                    return Err(StructError::ArraySize {
                        expected: *n,
                        actual: items.len(),
                    });
                }
                for item in items {
                    elem.encode(item, out)?;
                }
            }
        }
        Ok(())
    }

    /// Decode exactly `self.size()` bytes into the canonical value, or
    /// `None` for padding (consumed, never surfaced). Inverse of `encode`.
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<Value>, StructError> {
        if bytes.len() < self.size() {
            return Err(StructError::BufferLength {
                need: self.size(),
                got: bytes.len(),
            });
        }
        Ok(Some(match self {
            PrimType::Bool => Value::Bool(bytes[0] != 0),
            PrimType::Char => Value::Char(bytes[0] as char),
            PrimType::CharArray(n) => {
                let content = &bytes[..*n];
                let end = content.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                let s = std::str::from_utf8(&content[..end]).map_err(|_| {
                    StructError::TypeMismatch {
                        expected: "utf-8 string".to_string(),
                        actual: "non-utf-8 bytes".to_string(),
                    }
                })?;
                Value::Str(s.to_string())
            }
            PrimType::I8 => Value::Int(bytes[0] as i8 as i64),
            PrimType::U8 => Value::Uint(bytes[0] as u64),
            PrimType::I16 => Value::Int(LittleEndian::read_i16(bytes) as i64),
            PrimType::U16 => Value::Uint(LittleEndian::read_u16(bytes) as u64),
            PrimType::I32 => Value::Int(LittleEndian::read_i32(bytes) as i64),
            PrimType::U32 => Value::Uint(LittleEndian::read_u32(bytes) as u64),
            PrimType::I64 => Value::Int(LittleEndian::read_i64(bytes)),
            PrimType::U64 => Value::Uint(LittleEndian::read_u64(bytes)),
            PrimType::F32 => Value::F32(LittleEndian::read_f32(bytes)),
            PrimType::F64 => Value::F64(LittleEndian::read_f64(bytes)),
            PrimType::Padding(_) => return Ok(None),
            PrimType::Array(elem, n) => {
                let elem_size = elem.size();
                let mut items = Vec::with_capacity(*n);
                for i in 0..*n {
                    let chunk = &bytes[i * elem_size..(i + 1) * elem_size];
                    if let Some(v) = elem.decode(chunk)? {
                        items.push(v);
                    }
                }
                Value::List(items)
            }
        }))
    }
}

fn validate_char(c: char) -> Result<Value, StructError> {
    if (c as u32) <= 0xFF {
        Ok(Value::Char(c))
    } else {
        Err(StructError::TypeMismatch {
            expected: "single-byte character".to_string(),
            actual: format!("character U+{:04X}", c as u32),
        })
    }
}

fn mismatch(expected: &str, actual: &Value) -> StructError {
    StructError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.kind_name().to_string(),
    }
}
