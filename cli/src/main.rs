use std::io::Write;

use clap::{Parser, Subcommand};
use pullwatch_cli::{CliContext, commands, dir_watcher, logging, readline};

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init();
    let ctx = CliContext::new();

    // Initialize file index and start directory watcher
    if let Some(handle) = dir_watcher::init_watcher(&ctx).await {
        ctx.tasks.lock().await.watcher = Some(handle);
    }

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "raid pull tracker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a log file and load its session
    ParseFile {
        #[arg(short, long)]
        path: String,
    },
    /// Export the loaded session as JSON
    Export {
        #[arg(short, long)]
        out: String,
    },
    /// Tail the newest log, announcing attempts as they complete
    Follow,
    /// Stop following
    Stop,
    ListFiles,
    SetDirectory {
        #[arg(short, long)]
        path: String,
    },
    Stats,
    /// Persist a manual hit-type override for an ability id
    SetHitType {
        #[arg(short, long)]
        ability: String,
        #[arg(short = 't', long)]
        hit_type: String,
    },
    Overrides,
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "pullwatch".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::ParseFile { path }) => commands::parse_file(path, ctx).await,
        Some(Commands::Export { out }) => commands::export(out, ctx).await,
        Some(Commands::Follow) => commands::follow(ctx).await,
        Some(Commands::Stop) => commands::stop(ctx).await,
        Some(Commands::ListFiles) => commands::list_files(ctx).await,
        Some(Commands::SetDirectory { path }) => commands::set_directory(path, ctx).await,
        Some(Commands::Stats) => commands::show_stats(ctx).await,
        Some(Commands::SetHitType { ability, hit_type }) => {
            commands::set_hit_type(ability, hit_type, ctx).await
        }
        Some(Commands::Overrides) => commands::show_overrides(ctx).await,
        Some(Commands::Config) => commands::show_settings(ctx).await,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => Ok(false),
    }
}
