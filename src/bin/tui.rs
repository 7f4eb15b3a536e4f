// File: ./src/bin/tui.rs
use anyhow::Result;
use rundown::config::Config;
use rundown::context::{AppContext, StandardContext};
use rundown::model::ParseOptions;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Non-interactive commands log to stderr so stdout stays clean for output.
fn init_term_logger(config: &Config) {
    let _ = TermLogger::init(
        config.log_level_filter(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let binary_name = "rundown";

    let mut root: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" | "help" => {
                rundown::cli::print_help(binary_name);
                return Ok(());
            }
            "-r" | "--root" => {
                let Some(path) = args.get(i + 1) else {
                    eprintln!("Error: {} requires a path argument", args[i]);
                    std::process::exit(2);
                };
                root = Some(PathBuf::from(path));
                i += 2;
                continue;
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let ctx: Arc<dyn AppContext> = Arc::new(StandardContext::new(root));

    let config = match Config::load_or_init(ctx.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            // Syntax or permission problem, not a fresh install.
            eprintln!("Error loading configuration:\n{:#}", e);
            std::process::exit(1);
        }
    };

    match positional.first().map(String::as_str) {
        // CLI Command: rundown check <file.csv>
        Some("check") => {
            init_term_logger(&config);
            let Some(file) = positional.get(1) else {
                eprintln!("Error: check requires a file argument");
                eprintln!("Usage: {} check <file.csv>", binary_name);
                std::process::exit(2);
            };
            let options =
                ParseOptions::today().with_default_duration(config.default_duration_mins);
            let mut stdout = std::io::stdout();
            let problems =
                rundown::cli::check_sheet(&PathBuf::from(file), &options, &mut stdout).await?;
            if problems > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        // CLI Command: rundown export
        Some("export") => {
            init_term_logger(&config);
            println!("{}", rundown::cli::export_json(ctx.as_ref())?);
            Ok(())
        }
        // Normal TUI startup, optionally importing a sheet
        Some(file) => {
            let file = PathBuf::from(file);
            rundown::tui::run(ctx, config, Some(file)).await
        }
        None => rundown::tui::run(ctx, config, None).await,
    }
}
