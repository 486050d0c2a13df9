use std::fmt::Write;
use std::path::PathBuf;

use quarry_compiler::{CompiledUnit, ResultShape};
use quarry_ir::{dump, dump_hierarchy, dump_scan};

use super::fail;
use super::input::compile_unit;

pub struct DumpArgs {
    pub unit_path: PathBuf,
    pub dialect: Option<String>,
}

pub fn run(args: DumpArgs) {
    let unit = compile_unit(&args.unit_path, args.dialect.as_deref()).unwrap_or_else(|e| fail(e));
    print!("{}", render(&unit));
}

pub fn render(unit: &CompiledUnit) -> String {
    let mut out = dump(&unit.query);
    match &unit.result {
        ResultShape::None => {}
        ResultShape::Rows { columns } => {
            let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
            let _ = writeln!(out, "\nrows {} [{}]", unit.affinity, names.join(", "));
        }
        ResultShape::Hierarchical { hierarchy, scan } => {
            out.push('\n');
            out.push_str(&dump_hierarchy(hierarchy));
            out.push('\n');
            out.push_str(&dump_scan(scan));
        }
    }
    out
}
