//! Purpose: `qconf` CLI entry point: one-shot lookups against the configuration store.
//! Role: Binary crate root; parses args, opens a backend, runs one command, prints the result.
//! Invariants: Results go to stdout (plain lines, or one JSON document with `--json`).
//! Invariants: Errors go to stderr (JSON when stderr is not a terminal).
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Without `--fixture`, lookups go through the linked libqconf (feature `native`).
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{
    Args, CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use qconf::api::{
    Backend, Client, ClientOptions, Error, ErrorKind, FetchMode, MemoryBackend, to_exit_code,
};

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(exit_code);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `qconf --help` for usage."));
            }
        },
    };
    command_dispatch::dispatch_command(cli)?;
    Ok(0)
}

#[derive(Parser)]
#[command(
    name = "qconf",
    version,
    about = "Query the QConf configuration and service-discovery store",
    long_about = None,
    after_help = r#"EXAMPLES
  $ qconf get-conf /demo/conf
  $ qconf get-conf /demo/conf corp
  $ qconf --json get-batch-conf /demo/confs --idc corp
  $ qconf --fixture store.json get-allhost /demo/hosts

The idc may be given as a trailing argument, with --idc, or via QCONF_IDC.
When omitted, the store's default idc is queried."#,
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "QCONF_IDC", help = "Idc (zone) to query")]
    idc: Option<String>,
    #[arg(
        long,
        global = true,
        env = "QCONF_FIXTURE",
        value_hint = ValueHint::FilePath,
        help = "Serve lookups from a JSON fixture instead of libqconf"
    )]
    fixture: Option<PathBuf>,
    #[arg(long, global = true, help = "Do not wait for values the agent has not cached yet")]
    nowait: bool,
    #[arg(long, global = true, help = "Emit a single JSON document")]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    #[command(about = "Print the client version")]
    Version,
    #[command(name = "get-conf", visible_alias = "get_conf", about = "Get a configuration value")]
    GetConf(LookupArgs),
    #[command(name = "get-host", visible_alias = "get_host", about = "Get one service endpoint")]
    GetHost(LookupArgs),
    #[command(
        name = "get-allhost",
        visible_alias = "get_allhost",
        about = "Get every available service endpoint"
    )]
    GetAllhost(LookupArgs),
    #[command(
        name = "get-batch-conf",
        visible_alias = "get_batch_conf",
        about = "Get every key/value pair under a namespace"
    )]
    GetBatchConf(LookupArgs),
    #[command(
        name = "get-batch-keys",
        visible_alias = "get_batch_keys",
        about = "Get every key under a namespace"
    )]
    GetBatchKeys(LookupArgs),
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Args)]
pub(crate) struct LookupArgs {
    #[arg(help = "Path of the configuration item")]
    key: String,
    #[arg(help = "Idc to query (overrides --idc)")]
    idc: Option<String>,
}

impl Cli {
    fn options(&self) -> ClientOptions {
        let mode = if self.nowait {
            FetchMode::NoWait
        } else {
            FetchMode::Wait
        };
        ClientOptions::new().with_mode(mode)
    }
}

impl LookupArgs {
    fn idc<'a>(&'a self, cli_idc: Option<&'a str>) -> Option<&'a str> {
        self.idc.as_deref().or(cli_idc).filter(|idc| !idc.is_empty())
    }
}

fn open_client(
    fixture: Option<&Path>,
    options: ClientOptions,
) -> Result<Client<Box<dyn Backend>>, Error> {
    let backend: Box<dyn Backend> = match fixture {
        Some(path) => Box::new(MemoryBackend::from_fixture_path(path)?),
        None => native_backend()?,
    };
    Client::connect_with(backend, options)
}

#[cfg(feature = "native")]
fn native_backend() -> Result<Box<dyn Backend>, Error> {
    Ok(Box::new(qconf::api::NativeBackend::new()))
}

#[cfg(not(feature = "native"))]
fn native_backend() -> Result<Box<dyn Backend>, Error> {
    Err(Error::new(ErrorKind::Usage)
        .with_message("this build has no libqconf support")
        .with_hint("Pass --fixture <file>, or rebuild with `--features native`."))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error:").trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {err}");
        if let Some(hint) = err.hint() {
            eprintln!("hint: {hint}");
        }
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("error")),
    );
    if let Some(code) = err.code() {
        inner.insert("code".to_string(), json!(code));
    }
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(key) = err.key() {
        inner.insert("key".to_string(), json!(key));
    }
    if let Some(idc) = err.idc() {
        inner.insert("idc".to_string(), json!(idc));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, error_json};
    use clap::Parser;
    use qconf::api::Error;

    #[test]
    fn trailing_idc_overrides_flag() {
        let cli = Cli::try_parse_from(["qconf", "--idc", "corp", "get-conf", "/demo/conf", "bjt"])
            .expect("parse");
        let Command::GetConf(args) = &cli.command else {
            panic!("expected get-conf");
        };
        assert_eq!(args.idc(cli.idc.as_deref()), Some("bjt"));
    }

    #[test]
    fn underscore_aliases_are_accepted() {
        let cli = Cli::try_parse_from(["qconf", "get_batch_keys", "/demo/confs"]).expect("parse");
        let Command::GetBatchKeys(args) = &cli.command else {
            panic!("expected get-batch-keys");
        };
        assert_eq!(args.key, "/demo/confs");
        assert_eq!(args.idc(None), None);
    }

    #[test]
    fn error_json_carries_code_and_context() {
        let err = Error::from_code(10).with_key("/demo/conf").with_idc("corp");
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "NotFound");
        assert_eq!(value["error"]["code"], 10);
        assert_eq!(value["error"]["key"], "/demo/conf");
        assert_eq!(value["error"]["idc"], "corp");
    }
}
