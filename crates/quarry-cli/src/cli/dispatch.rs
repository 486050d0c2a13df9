//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::commands::aggregate::AggregateArgs;
use crate::commands::build::BuildArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::emit::EmitArgs;

pub struct DumpParams {
    pub unit_path: PathBuf,
    pub dialect: Option<String>,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            unit_path: unit_path(m),
            dialect: m.get_one::<String>("dialect").cloned(),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            unit_path: p.unit_path,
            dialect: p.dialect,
        }
    }
}

pub struct EmitParams {
    pub unit_path: PathBuf,
    pub dialect: Option<String>,
    pub output: Option<PathBuf>,
    pub iterator: bool,
    pub private: bool,
    pub runtime: Option<String>,
}

impl EmitParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            unit_path: unit_path(m),
            dialect: m.get_one::<String>("dialect").cloned(),
            output: m.get_one::<PathBuf>("output").cloned(),
            iterator: m.get_flag("iterator"),
            private: m.get_flag("private"),
            runtime: m.get_one::<String>("runtime").cloned(),
        }
    }
}

impl From<EmitParams> for EmitArgs {
    fn from(p: EmitParams) -> Self {
        Self {
            unit_path: p.unit_path,
            dialect: p.dialect,
            output: p.output,
            iterator: p.iterator,
            export: !p.private,
            runtime: p.runtime,
        }
    }
}

pub struct BuildParams {
    pub unit_path: PathBuf,
    pub dialect: Option<String>,
    pub params: Option<String>,
    pub system: Option<String>,
    pub row_lock: String,
    pub allow_empty_where: bool,
    pub compact: bool,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            unit_path: unit_path(m),
            dialect: m.get_one::<String>("dialect").cloned(),
            params: m.get_one::<String>("params").cloned(),
            system: m.get_one::<String>("system").cloned(),
            row_lock: m
                .get_one::<String>("row_lock")
                .cloned()
                .unwrap_or_default(),
            allow_empty_where: m.get_flag("allow_empty_where"),
            compact: m.get_flag("compact"),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            unit_path: p.unit_path,
            dialect: p.dialect,
            params: p.params,
            system: p.system,
            row_lock: p.row_lock,
            allow_empty_where: p.allow_empty_where,
            compact: p.compact,
        }
    }
}

pub struct AggregateParams {
    pub unit_path: PathBuf,
    pub dialect: Option<String>,
    pub rows: String,
    pub compact: bool,
}

impl AggregateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            unit_path: unit_path(m),
            dialect: m.get_one::<String>("dialect").cloned(),
            rows: m.get_one::<String>("rows").cloned().unwrap_or_default(),
            compact: m.get_flag("compact"),
        }
    }
}

impl From<AggregateParams> for AggregateArgs {
    fn from(p: AggregateParams) -> Self {
        Self {
            unit_path: p.unit_path,
            dialect: p.dialect,
            rows: p.rows,
            compact: p.compact,
        }
    }
}

/// The unit path is required, so clap guarantees it is present.
fn unit_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("unit_path").cloned().unwrap_or_default()
}
