//! Command builders for the CLI.
//!
//! Every command takes a unit file and an optional dialect override; the
//! rest of the flags are per command.

use clap::Command;

use super::args::*;

fn with_unit_args(cmd: Command) -> Command {
    cmd.arg(unit_path_arg()).arg(dialect_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("quarry")
        .about("Compile SQL template units into Rust data-access code")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(dump_command())
        .subcommand(emit_command())
        .subcommand(build_command())
        .subcommand(aggregate_command())
}

/// Show the compiled statement tree and result scan.
pub fn dump_command() -> Command {
    with_unit_args(
        Command::new("dump")
            .about("Show the compiled query, hierarchy and scan program")
            .after_help(
                r#"EXAMPLES:
  quarry dump find_users.json
  quarry dump find_users.json -d mysql
  cat unit.json | quarry dump -"#,
            ),
    )
}

/// Generate Rust source for a unit.
pub fn emit_command() -> Command {
    with_unit_args(
        Command::new("emit")
            .about("Generate Rust source for a unit")
            .after_help(
                r#"EXAMPLES:
  quarry emit find_users.json
  quarry emit find_users.json -o src/queries/find_users.rs
  quarry emit boards.json --iterator --private"#,
            ),
    )
    .arg(output_arg())
    .arg(iterator_arg())
    .arg(private_arg())
    .arg(runtime_arg())
}

/// Assemble SQL text and arguments for concrete parameters.
pub fn build_command() -> Command {
    with_unit_args(
        Command::new("build")
            .about("Assemble SQL text and arguments for given parameters")
            .after_help(
                r#"EXAMPLES:
  quarry build find_users.json -p '{"name": "ada"}'
  quarry build get_card.json -p @params.json --system '{"actor": "u1"}' --row-lock for_update
  quarry build delete_users.json --allow-empty-where"#,
            ),
    )
    .arg(params_arg())
    .arg(system_arg())
    .arg(row_lock_arg())
    .arg(allow_empty_where_arg())
    .arg(compact_arg())
}

/// Fold result rows into the unit's result shape.
pub fn aggregate_command() -> Command {
    with_unit_args(
        Command::new("aggregate")
            .about("Fold flat result rows into the unit's result shape")
            .after_help(
                r#"EXAMPLES:
  quarry aggregate boards.json -r '[{"id": 1, "tags__id": 10, "tags__label": "a"}]'
  quarry aggregate boards.json -r @rows.json --compact"#,
            ),
    )
    .arg(rows_arg())
    .arg(compact_arg())
}
