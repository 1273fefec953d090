use anyhow::anyhow;
use colored::Colorize;
use hgs_dirstate::Dirstate;
use hgs_status::{
    dirstate_lines, status_lines, Repository, StatusFormat, StatusKind, StatusSelection, WorkdirStatus,
};
use serde_json::{json, Value};

use crate::cli::*;

/// What a command produced, rendered once at the end.
enum Output {
    Lines(Vec<String>),
    Json(Value),
}

impl Output {
    fn print(self) -> anyhow::Result<()> {
        match self {
            Output::Lines(lines) => {
                for line in lines {
                    println!("{line}");
                }
            }
            Output::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        }
        Ok(())
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let start = match cli.repository {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| anyhow!("cannot determine current directory: {e}"))?,
    };
    let repo = Repository::open(&start, cli.config.as_deref())?;
    let format = cli.format;

    let output = match cli.command {
        Command::Root => cmd_root(&repo, format),
        Command::Branch => cmd_branch(&repo, format)?,
        Command::Parents => cmd_parents(&repo, format)?,
        Command::Status(args) => {
            let status = repo.status()?;
            if format == OutputFormat::Text {
                warn_access_errors(&status);
            }
            cmd_status(&status, &args, format)?
        }
        Command::DebugDirstate(args) => cmd_debugdirstate(&repo.dirstate()?, &args, format),
    };
    output.print()
}

fn cmd_root(repo: &Repository, format: OutputFormat) -> Output {
    match format {
        OutputFormat::Text => Output::Lines(vec![repo.root().display().to_string()]),
        OutputFormat::Json => Output::Json(json!({ "root": repo.root() })),
    }
}

fn cmd_branch(repo: &Repository, format: OutputFormat) -> anyhow::Result<Output> {
    let branch = repo.branch()?;
    Ok(match format {
        OutputFormat::Text => Output::Lines(vec![branch]),
        OutputFormat::Json => Output::Json(json!({ "branch": branch })),
    })
}

fn cmd_parents(repo: &Repository, format: OutputFormat) -> anyhow::Result<Output> {
    let parents = *repo.dirstate()?.parents();
    let mut hashes = vec![parents.p1.to_hex()];
    if parents.is_merge() {
        hashes.push(parents.p2.to_hex());
    }
    Ok(match format {
        OutputFormat::Text => Output::Lines(hashes),
        OutputFormat::Json => Output::Json(json!({ "parents": hashes })),
    })
}

fn selection(args: &StatusArgs) -> StatusSelection {
    if args.all {
        return StatusSelection::all();
    }
    let requested = StatusSelection {
        modified: args.modified,
        added: args.added,
        removed: args.removed,
        deleted: args.deleted,
        unknown: args.unknown,
        ignored: args.ignored,
        clean: args.clean,
    };
    if requested.is_empty() {
        StatusSelection::default_set()
    } else {
        requested
    }
}

fn cmd_status(status: &WorkdirStatus, args: &StatusArgs, format: OutputFormat) -> anyhow::Result<Output> {
    let selection = selection(args);
    match format {
        OutputFormat::Text => {
            let style = StatusFormat {
                no_status: args.no_status,
                copies: args.copies,
            };
            Ok(Output::Lines(status_lines(status, &selection, style)))
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(status)?;
            if let Value::Object(map) = &mut value {
                for kind in StatusKind::ALL {
                    if !selection.includes(kind) {
                        map.remove(kind.name());
                    }
                }
                if !args.copies {
                    map.remove("copies");
                }
            }
            Ok(Output::Json(value))
        }
    }
}

fn warn_access_errors(status: &WorkdirStatus) {
    for failure in &status.access_errors {
        eprintln!("{} {failure}", "warning:".yellow().bold());
    }
}

fn cmd_debugdirstate(dirstate: &Dirstate, args: &DebugDirstateArgs, format: OutputFormat) -> Output {
    match format {
        OutputFormat::Text => Output::Lines(dirstate_lines(dirstate, !args.nodates)),
        OutputFormat::Json => {
            let parents = dirstate.parents();
            let records: Vec<_> = dirstate.iter().collect();
            Output::Json(json!({
                "parents": { "p1": parents.p1.to_hex(), "p2": parents.p2.to_hex() },
                "records": records,
                "copies": dirstate.copy_map(),
            }))
        }
    }
}
