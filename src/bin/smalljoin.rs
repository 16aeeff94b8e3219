use std::error::Error;

use sarge::prelude::*;
use smalljoin::cli::{JoinArgs, SideArgs};
use smalljoin::{
    FileInput, FileOutput, InputProvider, JoinType, OutputTarget, StderrOutput, StdinInput,
    StdoutOutput,
};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  smalljoin (--index-file <path> | --exec <template>) [options] < stream");
    eprintln!();
    eprintln!("Right-hand side:");
    eprintln!("  --index-file <path>          Join against the rows of a file");
    eprintln!("  --exec <template>            Run a command per key, {{}} is replaced by the key");
    eprintln!("  --shell <shell>              Shell used for --exec (default: bash)");
    eprintln!();
    eprintln!("Keys (same flags with --right-* for the index file):");
    eprintln!("  --left-separator <sep>       Column separator, ',' is CSV aware");
    eprintln!("  --left-column=<n>            Zero-based join column, -1 for the whole row");
    eprintln!("  --left-json-subquery <path>  Query the row or column as JSON, e.g. data.id");
    eprintln!("  --left-clean                 Collapse doubled quotes before parsing JSON");
    eprintln!();
    eprintln!("Run:");
    eprintln!("  -j, --join <type>            inner | left | disjoint (default: inner)");
    eprintln!("  -c, --concurrency <n>        Join workers (default: 10)");
    eprintln!("  --buffer <n>                 Queued line batches (default: 5000)");
    eprintln!("  --continue-on-error          Report failing lines and keep going");
    eprintln!("  -v, --verbose                Report rows that did not join");
    eprintln!("  --config <file>              Load options from a YAML/TOML/JSON file");
    eprintln!("  -i, --input <path>           Read a file instead of stdin");
    eprintln!("  -o, --output <path>          Write results to a file instead of stdout");
}

macro_rules! flag_value {
    ($arg:expr, $args:expr, $name:literal) => {
        match $arg.get(&$args) {
            Some(Ok(v)) => Some(v),
            Some(Err(e)) => return Err(format!("invalid --{}: {e}", $name).into()),
            None => None,
        }
    };
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .try_init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut reader = ArgumentReader::new();

    let join_ref = reader.add::<JoinType>(tag::both('j', "join"));
    let index_ref = reader.add::<String>(tag::long("index-file"));
    let exec_ref = reader.add::<String>(tag::long("exec"));
    let shell_ref = reader.add::<String>(tag::long("shell"));

    let l_sep_ref = reader.add::<String>(tag::long("left-separator"));
    let l_col_ref = reader.add::<i64>(tag::long("left-column"));
    let l_json_ref = reader.add::<String>(tag::long("left-json-subquery"));
    let l_clean_ref = reader.add::<bool>(tag::long("left-clean"));
    let r_sep_ref = reader.add::<String>(tag::long("right-separator"));
    let r_col_ref = reader.add::<i64>(tag::long("right-column"));
    let r_json_ref = reader.add::<String>(tag::long("right-json-subquery"));
    let r_clean_ref = reader.add::<bool>(tag::long("right-clean"));

    let concurrency_ref = reader.add::<usize>(tag::both('c', "concurrency"));
    let buffer_ref = reader.add::<usize>(tag::long("buffer"));
    let continue_ref = reader.add::<bool>(tag::long("continue-on-error"));
    let verbose_ref = reader.add::<bool>(tag::both('v', "verbose"));
    let config_ref = reader.add::<String>(tag::long("config"));
    let input_ref = reader.add::<String>(tag::both('i', "input"));
    let output_ref = reader.add::<String>(tag::both('o', "output"));
    let help_ref = reader.add::<bool>(tag::both('h', "help"));

    let args = reader.parse()?;

    if flag_value!(help_ref, args, "help").unwrap_or(false) {
        print_usage();
        return Ok(());
    }

    let cli = JoinArgs {
        config: flag_value!(config_ref, args, "config"),
        join: flag_value!(join_ref, args, "join"),
        index_file: flag_value!(index_ref, args, "index-file"),
        exec: flag_value!(exec_ref, args, "exec"),
        shell: flag_value!(shell_ref, args, "shell"),
        left: SideArgs {
            separator: flag_value!(l_sep_ref, args, "left-separator"),
            column: flag_value!(l_col_ref, args, "left-column"),
            json_subquery: flag_value!(l_json_ref, args, "left-json-subquery"),
            clean: flag_value!(l_clean_ref, args, "left-clean").unwrap_or(false),
        },
        right: SideArgs {
            separator: flag_value!(r_sep_ref, args, "right-separator"),
            column: flag_value!(r_col_ref, args, "right-column"),
            json_subquery: flag_value!(r_json_ref, args, "right-json-subquery"),
            clean: flag_value!(r_clean_ref, args, "right-clean").unwrap_or(false),
        },
        concurrency: flag_value!(concurrency_ref, args, "concurrency"),
        buffer: flag_value!(buffer_ref, args, "buffer"),
        continue_on_error: flag_value!(continue_ref, args, "continue-on-error").unwrap_or(false),
        verbose: flag_value!(verbose_ref, args, "verbose").unwrap_or(false),
    };

    let input: Box<dyn InputProvider> = match flag_value!(input_ref, args, "input") {
        Some(path) if path != "-" => Box::new(FileInput::new(path)),
        _ => Box::new(StdinInput),
    };
    let output: Box<dyn OutputTarget> = match flag_value!(output_ref, args, "output") {
        Some(path) if path != "-" => Box::new(FileOutput::new(path)),
        _ => Box::new(StdoutOutput),
    };

    let config = cli.to_config()?;
    init_logging(config.verbose);

    let joiner = smalljoin::build_joiner_from_config(config)?;
    joiner.run_with(input.as_ref(), output.as_ref(), &StderrOutput)?;

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("smalljoin error: {e}");
        std::process::exit(1);
    }
}
