//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so commands can compose the same
//! definition.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Unit file (positional, "-" for stdin).
pub fn unit_path_arg() -> Arg {
    Arg::new("unit_path")
        .value_name("UNIT")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Query unit JSON file (use \"-\" for stdin)")
}

/// Dialect override (-d/--dialect).
pub fn dialect_arg() -> Arg {
    Arg::new("dialect")
        .short('d')
        .long("dialect")
        .value_name("DIALECT")
        .value_parser(["postgres", "pg", "mysql", "mariadb", "sqlite"])
        .help("Override the unit's dialect")
}

/// Output file (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write generated code to FILE instead of stdout")
}

/// Also emit a row iterator (--iterator).
pub fn iterator_arg() -> Arg {
    Arg::new("iterator")
        .long("iterator")
        .action(ArgAction::SetTrue)
        .help("Also emit a `<name>_iter` function over result rows")
}

/// Private items (--private).
pub fn private_arg() -> Arg {
    Arg::new("private")
        .long("private")
        .action(ArgAction::SetTrue)
        .help("Don't mark generated items `pub`")
}

/// Runtime crate path (--runtime).
pub fn runtime_arg() -> Arg {
    Arg::new("runtime")
        .long("runtime")
        .value_name("PATH")
        .help("Path of the runtime crate in generated code [default: quarry_vm]")
}

/// Parameter values (--params).
pub fn params_arg() -> Arg {
    Arg::new("params")
        .short('p')
        .long("params")
        .value_name("JSON")
        .help("Parameter values as a JSON object, or @FILE")
}

/// System values (--system).
pub fn system_arg() -> Arg {
    Arg::new("system")
        .long("system")
        .value_name("JSON")
        .help("Implicit parameter values as a JSON object, or @FILE")
}

/// Row lock mode (--row-lock).
pub fn row_lock_arg() -> Arg {
    Arg::new("row_lock")
        .long("row-lock")
        .value_name("MODE")
        .default_value("none")
        .value_parser([
            "none",
            "for_update",
            "for_share",
            "for_update_nowait",
            "for_update_skip_locked",
        ])
        .help("Row lock for queries with a row-lock clause")
}

/// Permit UPDATE/DELETE whose WHERE clause fell back (--allow-empty-where).
pub fn allow_empty_where_arg() -> Arg {
    Arg::new("allow_empty_where")
        .long("allow-empty-where")
        .action(ArgAction::SetTrue)
        .help("Allow UPDATE and DELETE statements whose WHERE clause fell back")
}

/// Result rows (--rows).
pub fn rows_arg() -> Arg {
    Arg::new("rows")
        .short('r')
        .long("rows")
        .value_name("JSON")
        .required(true)
        .help("Result rows as a JSON array of objects, or @FILE")
}

/// Single-line JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Print JSON on a single line")
}
