//! Header extractor tests: struct discovery, member/array/nested parsing,
//! comment attachment, and schema derivation.

use std::io::Write;

use cstructrs::{parse_header, parse_header_file, PrimType, Record, StructError, Value};

const SENSOR_HEADER: &str = r#"
// A single sensor reading
typedef struct {
    uint16_t id;        // sensor identifier
    int32_t temperature;
    float scale;
    char tag[8];
    bool active;
} SensorReading;
"#;

const NESTED_HEADER: &str = r#"
typedef struct {
    uint8_t version;
    struct {
        int16_t x;  // east offset
        int16_t y;  // north offset
    } origin;
    uint32_t crc;
} Frame;
"#;

#[test]
fn parse_simple_struct() {
    let defs = parse_header(SENSOR_HEADER);
    assert_eq!(defs.len(), 1);
    let def = &defs[0];
    assert_eq!(def.name, "SensorReading");
    let names: Vec<&str> = def.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["id", "temperature", "scale", "tag", "active"]);

    let tag = &def.members[3];
    assert_eq!(tag.type_name, "char");
    assert_eq!(tag.array_len, Some(8));
}

#[test]
fn struct_and_member_comments_attached() {
    let defs = parse_header(SENSOR_HEADER);
    let def = &defs[0];
    assert_eq!(def.doc.as_deref(), Some("A single sensor reading"));
    assert_eq!(def.members[0].doc.as_deref(), Some("sensor identifier"));
    assert_eq!(def.members[1].doc, None);
}

#[test]
fn derived_schema_layout() {
    let defs = parse_header(SENSOR_HEADER);
    let schema = defs[0].to_schema().expect("schema");
    assert_eq!(schema.size(), 2 + 4 + 4 + 8 + 1);

    // char tag[8] becomes a char array, not an array of char.
    match &schema.field("tag").expect("tag field").ty {
        cstructrs::FieldType::Prim(PrimType::CharArray(8)) => {}
        other => panic!("expected char array, got {:?}", other),
    }
    // Doc comments survive onto the derived fields.
    assert_eq!(
        schema.field("id").and_then(|f| f.doc.as_deref()),
        Some("sensor identifier")
    );
}

#[test]
fn derived_schema_packs_and_unpacks() {
    let defs = parse_header(SENSOR_HEADER);
    let schema = defs[0].to_schema().expect("schema");

    let rec = Record::with_values(
        &schema,
        [
            ("id", Value::Uint(513)),
            ("temperature", Value::Int(-40)),
            ("scale", Value::F32(0.5)),
            ("tag", Value::Str("probe".to_string())),
            ("active", Value::Bool(true)),
        ],
    )
    .expect("record");

    let packed = rec.pack().expect("pack");
    assert_eq!(packed.len(), schema.size());
    assert_eq!(Record::unpack(&schema, &packed).expect("unpack"), rec);
}

#[test]
fn nested_struct_members() {
    let defs = parse_header(NESTED_HEADER);
    assert_eq!(defs.len(), 1);
    let def = &defs[0];
    assert_eq!(def.name, "Frame");
    assert_eq!(def.members.len(), 3);

    let origin = &def.members[1];
    assert_eq!(origin.name, "origin");
    assert_eq!(origin.type_name, "struct");
    let nested = origin.nested.as_ref().expect("nested members");
    assert_eq!(nested.len(), 2);
    assert_eq!(nested[0].name, "x");
    assert_eq!(nested[0].doc.as_deref(), Some("east offset"));

    let schema = def.to_schema().expect("schema");
    assert_eq!(schema.size(), 1 + 4 + 4);
}

#[test]
fn nested_schema_roundtrip() {
    let defs = parse_header(NESTED_HEADER);
    let schema = defs[0].to_schema().expect("schema");
    let origin_schema = match &schema.field("origin").expect("origin").ty {
        cstructrs::FieldType::Nested(s) => s.clone(),
        other => panic!("expected nested schema, got {:?}", other),
    };

    let origin = Record::with_values(
        &origin_schema,
        [("x", Value::Int(100)), ("y", Value::Int(-100))],
    )
    .unwrap();
    let rec = Record::with_values(
        &schema,
        [
            ("version", Value::Uint(2)),
            ("origin", Value::Struct(origin)),
            ("crc", Value::Uint(0xDEADBEEF)),
        ],
    )
    .unwrap();

    let packed = rec.pack().unwrap();
    assert_eq!(Record::unpack(&schema, &packed).unwrap(), rec);
}

#[test]
fn multiple_structs_in_one_header() {
    let src = r#"
typedef struct { uint8_t a; } First;
typedef struct { uint16_t b; uint16_t c; } Second;
"#;
    let defs = parse_header(src);
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].name, "First");
    assert_eq!(defs[1].name, "Second");
    assert_eq!(defs[1].members.len(), 2);
}

#[test]
fn unknown_types_are_skipped() {
    let src = r#"
typedef struct {
    uint8_t known;
    size_t mystery;
    struct foo *pointer;
} Partial;
"#;
    let defs = parse_header(src);
    assert_eq!(defs.len(), 1);
    let names: Vec<&str> = defs[0].members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["known"]);
}

#[test]
fn non_struct_text_yields_nothing() {
    assert!(parse_header("#define MAX 10\nint add(int a, int b);").is_empty());
    assert!(parse_header("").is_empty());
}

#[test]
fn manual_member_descriptors_build_schemas() {
    // The descriptor shape is a construction interface of its own, not just
    // a parse artifact.
    use cstructrs::{Member, StructDef};
    let def = StructDef {
        name: "Manual".to_string(),
        members: vec![
            Member {
                name: "kind".to_string(),
                type_name: "uint8_t".to_string(),
                array_len: None,
                nested: None,
                doc: None,
                line: 0,
            },
            Member {
                name: "weights".to_string(),
                type_name: "int16_t".to_string(),
                array_len: Some(3),
                nested: None,
                doc: None,
                line: 0,
            },
        ],
        doc: None,
        line: 0,
    };
    let schema = def.to_schema().expect("schema");
    assert_eq!(schema.size(), 1 + 6);

    let bad = StructDef {
        name: "Bad".to_string(),
        members: vec![Member {
            name: "huh".to_string(),
            type_name: "size_t".to_string(),
            array_len: None,
            nested: None,
            doc: None,
            line: 0,
        }],
        doc: None,
        line: 0,
    };
    assert!(matches!(
        bad.to_schema(),
        Err(StructError::TypeMismatch { .. })
    ));
}

#[test]
fn parse_header_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(SENSOR_HEADER.as_bytes()).expect("write");
    let defs = parse_header_file(file.path()).expect("read");
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "SensorReading");
}
