//! Purpose: Hold top-level CLI command dispatch for `qconf`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: `version` and `completion` never open a backend.
//! Invariants: Plain output prints one item per line; batch conf prints `key=value`.

use super::*;

pub(super) fn dispatch_command(cli: Cli) -> Result<(), Error> {
    let options = cli.options();
    let cli_idc = cli.idc.as_deref();
    match &cli.command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(*shell, &mut cmd, "qconf", &mut io::stdout());
            Ok(())
        }
        Command::Version => {
            if cli.json {
                emit_json(json!({ "version": qconf::api::version() }));
            } else {
                println!("Version : {}", qconf::api::version());
            }
            Ok(())
        }
        Command::GetConf(args) => {
            let client = open_client(cli.fixture.as_deref(), options)?;
            let idc = args.idc(cli_idc);
            let value = client.get_conf(&args.key, idc)?;
            if cli.json {
                emit_json(json!({ "key": args.key, "idc": idc, "value": value }));
            } else {
                println!("{value}");
            }
            Ok(())
        }
        Command::GetHost(args) => {
            let client = open_client(cli.fixture.as_deref(), options)?;
            let idc = args.idc(cli_idc);
            let host = client.get_host(&args.key, idc)?;
            if cli.json {
                emit_json(json!({ "key": args.key, "idc": idc, "host": host }));
            } else {
                println!("{host}");
            }
            Ok(())
        }
        Command::GetAllhost(args) => {
            let client = open_client(cli.fixture.as_deref(), options)?;
            let idc = args.idc(cli_idc);
            let hosts = client.get_all_host(&args.key, idc)?;
            if cli.json {
                emit_json(json!({ "key": args.key, "idc": idc, "hosts": hosts }));
            } else {
                emit_lines(&hosts);
            }
            Ok(())
        }
        Command::GetBatchConf(args) => {
            let client = open_client(cli.fixture.as_deref(), options)?;
            let idc = args.idc(cli_idc);
            let confs = client.get_batch_conf(&args.key, idc)?;
            if cli.json {
                emit_json(json!({ "key": args.key, "idc": idc, "confs": confs }));
            } else {
                for (key, value) in &confs {
                    println!("{key}={value}");
                }
            }
            Ok(())
        }
        Command::GetBatchKeys(args) => {
            let client = open_client(cli.fixture.as_deref(), options)?;
            let idc = args.idc(cli_idc);
            let keys = client.get_batch_keys(&args.key, idc)?;
            if cli.json {
                emit_json(json!({ "key": args.key, "idc": idc, "keys": keys }));
            } else {
                emit_lines(&keys);
            }
            Ok(())
        }
    }
}

fn emit_lines(items: &[String]) {
    for item in items {
        println!("{item}");
    }
}
