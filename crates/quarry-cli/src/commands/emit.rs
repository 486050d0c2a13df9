use std::fs;
use std::path::PathBuf;

use quarry_compiler::EmitConfig;
use quarry_compiler::typegen::rust::emit_with_config;

use super::fail;
use super::input::compile_unit;

pub struct EmitArgs {
    pub unit_path: PathBuf,
    pub dialect: Option<String>,
    pub output: Option<PathBuf>,
    pub iterator: bool,
    pub export: bool,
    pub runtime: Option<String>,
}

pub fn run(args: EmitArgs) {
    let unit = compile_unit(&args.unit_path, args.dialect.as_deref()).unwrap_or_else(|e| fail(e));

    let mut config = EmitConfig::new().export(args.export).iterator(args.iterator);
    if let Some(runtime) = args.runtime {
        config = config.runtime(runtime);
    }
    let code = emit_with_config(&unit, config).unwrap_or_else(|e| fail(e));

    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &code) {
                fail(format!("failed to write '{}': {}", path.display(), e));
            }
            tracing::info!(path = %path.display(), "wrote generated code");
        }
        None => print!("{}", code),
    }
}
