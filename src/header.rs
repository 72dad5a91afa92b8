//! C header schema extractor: derive struct descriptors from a restricted
//! `typedef struct { ... } Name;` subset.
//!
//! This is text-processing glue with no binary-format invariants of its own:
//! it scans source text with regexes (fixed-width stdint scalars, `char`
//! buffers, fixed arrays, one level of nested `struct { ... } name;`
//! members, `//` and `/* */` comments) and hands the struct engine a list of
//! member descriptors. Members with unrecognized types are skipped.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::error::StructError;
use crate::schema::{Field, FieldType, Schema};
use crate::types::PrimType;

/// A complete extracted struct definition.
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub members: Vec<Member>,
    pub doc: Option<String>,
    pub line: usize,
}

/// One extracted member: the descriptor shape the struct engine consumes as
/// an alternative schema-construction path.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    /// C type name (`uint8_t`, `char`, ...) or `"struct"` for nested members.
    pub type_name: String,
    pub array_len: Option<usize>,
    pub nested: Option<Vec<Member>>,
    pub doc: Option<String>,
    pub line: usize,
}

/// Map a C type name onto its primitive descriptor.
pub fn prim_for_c_type(name: &str) -> Option<PrimType> {
    Some(match name {
        "int8_t" => PrimType::I8,
        "uint8_t" => PrimType::U8,
        "int16_t" => PrimType::I16,
        "uint16_t" => PrimType::U16,
        "int32_t" => PrimType::I32,
        "uint32_t" => PrimType::U32,
        "int64_t" => PrimType::I64,
        "uint64_t" => PrimType::U64,
        "float" => PrimType::F32,
        "double" => PrimType::F64,
        "char" => PrimType::Char,
        "bool" => PrimType::Bool,
        _ => return None,
    })
}

/// Parse header source text into struct definitions. Unparseable regions are
/// skipped, not errors; an empty result just means no `typedef struct` block
/// was recognized.
pub fn parse_header(content: &str) -> Vec<StructDef> {
    let comments = extract_comments(content);
    let mut defs = Vec::new();
    for m in typedef_open_re().find_iter(content) {
        let open_end = m.end();
        let close = match matching_brace(content, open_end) {
            Some(i) => i,
            None => continue,
        };
        let name = match typedef_name_re().captures(&content[close + 1..]) {
            Some(caps) => match caps.get(1) {
                Some(g) => g.as_str().to_string(),
                None => continue,
            },
            None => continue,
        };
        let struct_line = content[..m.start()].matches('\n').count() + 1;
        let lines: Vec<&str> = content[open_end..close].split('\n').collect();
        let members = parse_members(&lines, struct_line, &comments);
        defs.push(StructDef {
            name,
            members,
            doc: comments.get(&struct_line.wrapping_sub(1)).cloned(),
            line: struct_line,
        });
    }
    defs
}

/// Parse a header file from disk.
pub fn parse_header_file(path: impl AsRef<Path>) -> io::Result<Vec<StructDef>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_header(&content))
}

impl StructDef {
    /// Derive a schema from this definition: `char` scalars become CHAR,
    /// `char name[N]` becomes a char array, other arrays become fixed
    /// arrays, nested members become nested schemas. Doc comments are
    /// carried onto the fields.
    pub fn to_schema(&self) -> Result<Arc<Schema>, StructError> {
        members_to_schema(&self.name, &self.members)
    }
}

fn members_to_schema(name: &str, members: &[Member]) -> Result<Arc<Schema>, StructError> {
    let mut fields = Vec::with_capacity(members.len());
    for m in members {
        let ty: FieldType = if let Some(nested) = &m.nested {
            FieldType::Nested(members_to_schema(&m.name, nested)?)
        } else if m.type_name == "char" {
            match m.array_len {
                Some(n) => PrimType::CharArray(n).into(),
                None => PrimType::Char.into(),
            }
        } else {
            let prim = prim_for_c_type(&m.type_name).ok_or_else(|| StructError::TypeMismatch {
                expected: "known C scalar type".to_string(),
                actual: m.type_name.clone(),
            })?;
            match m.array_len {
                Some(n) => PrimType::array(prim, n)?.into(),
                None => prim.into(),
            }
        };
        fields.push(Field {
            name: m.name.clone(),
            ty,
            default: None,
            doc: m.doc.clone(),
        });
    }
    Schema::from_fields(name, fields)
}

/// Map line numbers to the comment found on (or starting at) that line.
fn extract_comments(content: &str) -> HashMap<usize, String> {
    let mut comments = HashMap::new();
    for caps in line_comment_re().captures_iter(content) {
        if let (Some(whole), Some(text)) = (caps.get(0), caps.get(1)) {
            let line = content[..whole.start()].matches('\n').count() + 1;
            comments.insert(line, text.as_str().trim().to_string());
        }
    }
    for m in block_comment_re().find_iter(content) {
        let line = content[..m.start()].matches('\n').count() + 1;
        let text = m.as_str();
        let inner = text[2..text.len() - 2].trim().to_string();
        comments.insert(line, inner);
    }
    comments
}

fn parse_members(lines: &[&str], first_line_no: usize, comments: &HashMap<usize, String>) -> Vec<Member> {
    let mut members = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line_no = first_line_no + i;
        let line = lines[i].trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with("/*") {
            i += 1;
            continue;
        }
        if line.starts_with("struct") && line.contains('{') {
            if let Some((nested, name, end)) = parse_nested(lines, i, first_line_no, comments) {
                members.push(Member {
                    name,
                    type_name: "struct".to_string(),
                    array_len: None,
                    nested: Some(nested),
                    doc: comments.get(&line_no).cloned(),
                    line: line_no,
                });
                i = end + 1;
                continue;
            }
            i += 1;
            continue;
        }
        let code = strip_comments_from_line(lines[i]);
        for segment in code.split(';') {
            if let Some((type_name, name, array_len)) = parse_member_segment(segment) {
                if prim_for_c_type(&type_name).is_some() {
                    members.push(Member {
                        name,
                        type_name,
                        array_len,
                        nested: None,
                        doc: comments.get(&line_no).cloned(),
                        line: line_no,
                    });
                }
            }
        }
        i += 1;
    }
    members
}

/// Nested `struct { ... } name;` member: scan to the balancing brace, pull
/// the member name off the closing line, recurse into the body.
fn parse_nested(
    lines: &[&str],
    start: usize,
    first_line_no: usize,
    comments: &HashMap<usize, String>,
) -> Option<(Vec<Member>, String, usize)> {
    let mut depth = 0i32;
    let mut end = None;
    for (j, l) in lines.iter().enumerate().skip(start) {
        for c in l.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
        }
        if depth <= 0 {
            end = Some(j);
            break;
        }
    }
    let end = end?;
    let name = nested_name_re()
        .captures(lines[end])
        .and_then(|c| c.get(1))
        .map(|g| g.as_str().to_string())
        .unwrap_or_else(|| "anonymous".to_string());
    let members = if end > start {
        parse_members(&lines[start + 1..end], first_line_no + start + 1, comments)
    } else {
        // Whole nested struct on one line: parse the text between the braces.
        let l = lines[start];
        match (l.find('{'), l.rfind('}')) {
            (Some(a), Some(b)) if b > a => {
                parse_members(&[&l[a + 1..b]], first_line_no + start, comments)
            }
            _ => Vec::new(),
        }
    };
    Some((members, name, end))
}

fn strip_comments_from_line(line: &str) -> String {
    let code = match line.find("//") {
        Some(i) => &line[..i],
        None => line,
    };
    block_comment_re().replace_all(code, "").to_string()
}

/// Parse one declaration segment (semicolon already split off):
/// `type name` or `type name[N]`.
fn parse_member_segment(segment: &str) -> Option<(String, String, Option<usize>)> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }
    if let Some(caps) = member_array_re().captures(segment) {
        let type_name = caps.get(1)?.as_str().to_string();
        let name = caps.get(2)?.as_str().to_string();
        let len = caps.get(3)?.as_str().parse().ok()?;
        return Some((type_name, name, Some(len)));
    }
    if let Some(caps) = member_scalar_re().captures(segment) {
        let type_name = caps.get(1)?.as_str().to_string();
        let name = caps.get(2)?.as_str().to_string();
        return Some((type_name, name, None));
    }
    None
}

fn matching_brace(content: &str, after_open: usize) -> Option<usize> {
    let mut depth = 1i32;
    for (i, b) in content[after_open..].bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(after_open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn typedef_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"typedef\s+struct\s*\{").expect("regex"))
}

fn typedef_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\w+)\s*;").expect("regex"))
}

fn nested_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\}\s*(\w+)\s*;").expect("regex"))
}

fn line_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"//([^\n]*)").expect("regex"))
}

fn block_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("regex"))
}

fn member_array_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\s+(\w+)\s*\[\s*(\d+)\s*\]$").expect("regex"))
}

fn member_scalar_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\s+(\w+)$").expect("regex"))
}
