use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Once,
    time::Instant,
};

use cscript_check::{
    checker::{
        checker::Unit,
        merge::{check_units, Program},
    },
    config::{Config, USAGE},
    display_error,
};

static TRACING_INIT: Once = Once::new();

/// Installs a subscriber filtered by `RUST_LOG`, if it is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();

    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {}", error);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let mut sources: Vec<(PathBuf, String)> = vec![];
    for path in &config.inputs {
        match read_to_string(path) {
            Ok(source) => sources.push((path.clone(), source)),
            Err(error) => {
                eprintln!("error: failed to read {}: {}", path.display(), error);
                return ExitCode::FAILURE;
            }
        }
    }

    let mut units = vec![];
    let mut parse_failed = false;
    for (path, source) in &sources {
        match Unit::from_source(source, &file_name(path)) {
            Ok(unit) => units.push(unit),
            Err(error) => {
                display_error(&error, path, source);
                parse_failed = true;
            }
        }
    }

    println!("Parsed in {:?}", start.elapsed());

    if parse_failed {
        return ExitCode::FAILURE;
    }

    let check_start = Instant::now();
    let program = check_units(&units);

    println!("Checked in {:?}", check_start.elapsed());

    for error in &program.diagnostics {
        let file = error.get_position().1.as_str();
        match sources.iter().find(|(path, _)| file_name(path) == file) {
            Some((path, source)) => display_error(error, path, source),
            None => println!("Error: {} ({})", error.get_error_name(), error),
        }
    }

    if config.dump_types {
        dump_types(&program);
    }

    if config.dump_metadata {
        dump_metadata(&program);
    }

    println!("Total time: {:?}", start.elapsed());

    if program.is_ok() {
        ExitCode::SUCCESS
    } else {
        println!("{} error(s)", program.diagnostics.len());
        ExitCode::FAILURE
    }
}

fn file_name(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn dump_types(program: &Program) {
    println!("Types:");
    for (id, descriptor) in program.types.iter() {
        if id.is_primitive() {
            continue;
        }
        println!("  {:>4} {:<24} {:?}", id.index(), program.types.type_name(id), descriptor);
    }
}

fn dump_metadata(program: &Program) {
    for unit in &program.units {
        println!("{}:", unit.file);

        for (name, value) in &unit.consts {
            println!("  const {} = {}", name, value);
        }

        for scope in &unit.unwrap_scopes {
            println!(
                "  unwrap @{} scope {} -> &{}{} (was {:?})",
                scope.position.0,
                scope.scope,
                unit.types.type_name(scope.element_type),
                if scope.refcount_applicable { "" } else { " (extern)" },
                scope.pointer_state
            );
        }

        for site in &unit.allocations {
            println!(
                "  new @{} -> *{}",
                site.position.0,
                unit.types.type_name(site.pointee)
            );
        }
    }
}
