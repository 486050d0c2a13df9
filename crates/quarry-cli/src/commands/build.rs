use std::path::PathBuf;

use quarry_compiler::CompiledUnit;
use quarry_vm::{Env, Interpreter, RowLockMode, Value, WhereGuard};

use super::fail;
use super::input::{compile_unit, load_json};

pub struct BuildArgs {
    pub unit_path: PathBuf,
    pub dialect: Option<String>,
    pub params: Option<String>,
    pub system: Option<String>,
    pub row_lock: String,
    pub allow_empty_where: bool,
    pub compact: bool,
}

pub fn run(args: BuildArgs) {
    let unit = compile_unit(&args.unit_path, args.dialect.as_deref()).unwrap_or_else(|e| fail(e));
    match build(&unit, &args) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

/// Run the unit's query program and render the built query as JSON.
pub fn build(unit: &CompiledUnit, args: &BuildArgs) -> Result<String, String> {
    let params = match &args.params {
        Some(arg) => Value::from(load_json(arg)?),
        None => Value::Null,
    };
    let mut env = Env::new(params).row_lock(args.row_lock.parse::<RowLockMode>()?);
    if let Some(arg) = &args.system {
        env = env.system(Value::from(load_json(arg)?));
    }

    let built = Interpreter::run(&unit.query, &env).map_err(|e| e.to_string())?;
    let guard = WhereGuard::new()
        .allow_update(args.allow_empty_where)
        .allow_delete(args.allow_empty_where);
    built.enforce(&guard).map_err(|e| e.to_string())?;

    let json = if args.compact {
        serde_json::to_string(&built)
    } else {
        serde_json::to_string_pretty(&built)
    };
    json.map_err(|e| e.to_string())
}
