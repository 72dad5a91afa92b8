//! # cstructrs — declarative fixed-layout C struct schemas
//!
//! Describe C-style record types (fixed-width scalars, char buffers, fixed
//! arrays, explicit padding, nested records) as schemas, then pack instances
//! to a deterministic little-endian byte layout and unpack byte buffers back
//! into validated instances. A companion extractor derives the same schemas
//! from C header source text.
//!
//! ## Field kinds
//!
//! - Scalars: `bool`, `char`, `i8`/`u8` .. `i64`/`u64`, `f32`, `f64`
//! - `CharArray(n)`: fixed-capacity string, NUL-padded on the wire
//! - `Array(kind, n)`: exactly `n` homogeneous elements
//! - `Padding(n)`: reserved bytes, zeroed on encode, skipped on decode
//! - Nested schemas, laid out inline (no length prefix, no type tag)
//!
//! Every assignment is validated eagerly against the declared field type;
//! range, shape, and type errors surface at the point of mutation, never at
//! pack time (only a missing required field is inherently a pack-time error).
//!
//! ## Example
//!
//! ```
//! use cstructrs::{PrimType, Record, Schema, Value};
//!
//! let point = Schema::builder("Point")
//!     .field("x", PrimType::I16)
//!     .field("y", PrimType::I16)
//!     .build()
//!     .unwrap();
//!
//! let rec = Record::with_values(&point, [("x", Value::Int(-3)), ("y", Value::Int(7))]).unwrap();
//! let bytes = rec.pack().unwrap();
//! assert_eq!(bytes.len(), point.size());
//! assert_eq!(Record::unpack(&point, &bytes).unwrap(), rec);
//! ```
//!
//! ## Header extraction
//!
//! ```
//! use cstructrs::parse_header;
//!
//! let defs = parse_header("typedef struct { uint16_t id; char tag[4]; } Item;");
//! let schema = defs[0].to_schema().unwrap();
//! assert_eq!(schema.size(), 6);
//! ```

pub mod error;
pub mod header;
pub mod record;
pub mod schema;
pub mod types;
pub mod value;

pub use error::StructError;
pub use header::{parse_header, parse_header_file, Member, StructDef};
pub use record::Record;
pub use schema::{Field, FieldType, Schema, SchemaBuilder};
pub use types::PrimType;
pub use value::Value;
