//! Dump struct schemas derived from C header files.
//!
//! Usage:
//!   dump_header [OPTIONS] [FILE.h ...]
//!   dump_header < file.h
//!
//! For each `typedef struct` found, prints the derived schema with per-field
//! offset/size and the total packed size.
//!
//! Options:
//!   --docs, -d   Also print extracted doc comments
//!
//! If no files are given, reads from stdin.

use cstructrs::{parse_header, FieldType, PrimType, StructDef};
use std::io::Read;

fn type_label(ty: &FieldType) -> String {
    match ty {
        FieldType::Prim(p) => prim_label(p),
        FieldType::Nested(s) => format!("struct {}", s.name()),
    }
}

fn prim_label(p: &PrimType) -> String {
    match p {
        PrimType::CharArray(n) => format!("char[{}]", n),
        PrimType::Padding(n) => format!("padding({})", n),
        PrimType::Array(elem, n) => format!("{}[{}]", prim_label(elem), n),
        other => other.name().to_string(),
    }
}

fn print_def(def: &StructDef, show_docs: bool) -> anyhow::Result<()> {
    let schema = def
        .to_schema()
        .map_err(|e| anyhow::anyhow!("struct {}: {}", def.name, e))?;
    println!("struct {} ({} bytes)", schema.name(), schema.size());
    if show_docs {
        if let Some(doc) = &def.doc {
            println!("  doc: {}", doc);
        }
    }
    let mut offset = 0usize;
    for field in schema.fields() {
        let size = field.ty.size();
        println!(
            "  {:>4}  {:>4}  {}: {}",
            offset,
            size,
            field.name,
            type_label(&field.ty)
        );
        if show_docs {
            if let Some(doc) = &field.doc {
                println!("            {}", doc);
            }
        }
        offset += size;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let show_docs = if let Some(pos) = args.iter().position(|a| a == "--docs" || a == "-d") {
        args.remove(pos);
        true
    } else {
        false
    };

    let mut has_error = false;
    let mut total = 0usize;

    if args.is_empty() {
        let mut src = String::new();
        std::io::stdin().read_to_string(&mut src)?;
        for def in parse_header(&src) {
            if let Err(e) = print_def(&def, show_docs) {
                eprintln!("<stdin>: {}", e);
                has_error = true;
            }
            total += 1;
        }
    } else {
        for path in &args {
            let defs = match cstructrs::parse_header_file(path) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("{}: {}", path, e);
                    has_error = true;
                    continue;
                }
            };
            for def in defs {
                if let Err(e) = print_def(&def, show_docs) {
                    eprintln!("{}: {}", path, e);
                    has_error = true;
                }
                total += 1;
            }
        }
    }

    if total == 0 {
        eprintln!("no struct definitions found");
    }
    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
