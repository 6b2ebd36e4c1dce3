//! fractal CLI - read, write and render JSON/YAML documents by dotted path
//!
//! Usage:
//!   fractal get package.json author.name
//!   fractal set package.json version '"1.2.0"' --output package.json
//!   fractal render package.json 'Author: ${author.name}'

use clap::{Parser, Subcommand};
use colored::Colorize;
use fractal_core::{Context, Error, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// fractal - Path-addressable access to JSON and YAML documents
#[derive(Parser)]
#[command(name = "fractal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a path
    Get {
        /// Document to read (JSON or YAML)
        file: PathBuf,

        /// Path to the value (e.g., author.name or items.0)
        path: String,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Default value if the path does not resolve
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Write a value at a path and print the updated document
    Set {
        /// Document to update (JSON or YAML)
        file: PathBuf,

        /// Path to write (intermediate maps are created)
        path: String,

        /// Value to store; parsed as JSON when possible, otherwise a string
        value: String,

        /// Output format: json, yaml (defaults to the input format)
        #[arg(short, long)]
        format: Option<String>,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the keys of the map at a path
    Keys {
        /// Document to read (JSON or YAML)
        file: PathBuf,

        /// Path to a map (defaults to the root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Print the number of entries of the map or list at a path
    Length {
        /// Document to read (JSON or YAML)
        file: PathBuf,

        /// Path to a map or list (defaults to the root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Exit with status 0 if the path resolves, 1 otherwise
    Exists {
        /// Document to read (JSON or YAML)
        file: PathBuf,

        /// Path to check
        path: String,
    },

    /// Replace ${path} placeholders in a template
    Render {
        /// Document providing the values (JSON or YAML)
        file: PathBuf,

        /// Template text
        template: String,

        /// Fail if any placeholder does not resolve
        #[arg(short, long)]
        strict: bool,
    },
}

/// Document encodings understood by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Format::Json),
            Some("yaml" | "yml") => Some(Format::Yaml),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Result<Self, String> {
        match name {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(format!("Unsupported format: {}. Use json or yaml.", other)),
        }
    }
}

/// Run the CLI with the process arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Get {
            file,
            path,
            format,
            default,
        } => cmd_get(&file, &path, &format, default),

        Commands::Set {
            file,
            path,
            value,
            format,
            output,
        } => cmd_set(&file, &path, &value, format.as_deref(), output),

        Commands::Keys { file, path } => cmd_keys(&file, &path),

        Commands::Length { file, path } => cmd_length(&file, &path),

        Commands::Exists { file, path } => cmd_exists(&file, &path),

        Commands::Render {
            file,
            template,
            strict,
        } => cmd_render(&file, &template, strict),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when embedded in another binary.
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn load_context(file: &Path) -> Result<(Context, Format), String> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;

    let parsed = match Format::from_path(file) {
        Some(Format::Json) => parse_json(&content).map(|ctx| (ctx, Format::Json)),
        Some(Format::Yaml) => parse_yaml(&content).map(|ctx| (ctx, Format::Yaml)),
        None => {
            log::debug!("Unknown extension for {}, trying JSON then YAML", file.display());
            parse_json(&content)
                .map(|ctx| (ctx, Format::Json))
                .or_else(|_| parse_yaml(&content).map(|ctx| (ctx, Format::Yaml)))
        }
    };

    parsed.map_err(|e| format!("Failed to load {}: {}", file.display(), e))
}

fn parse_json(content: &str) -> Result<Context, String> {
    Context::try_from_json(content).map_err(|e| e.to_string())
}

fn parse_yaml(content: &str) -> Result<Context, String> {
    serde_yaml::from_str::<Value>(content)
        .map(Context::new)
        .map_err(|e| format!("Invalid YAML: {}", e))
}

/// Interpret a command-line value: JSON if it parses, a plain string otherwise
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn render_document(ctx: &Context, format: Format) -> Result<String, String> {
    match format {
        Format::Json => ctx
            .to_json_pretty()
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::to_string(ctx.data()).map_err(|e| e.to_string()),
    }
}

fn render_value(value: &Value, format: &str) -> Result<String, String> {
    match format {
        "json" => serde_json::to_string_pretty(value)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        _ => match value {
            // For complex values, output as YAML
            Value::Sequence(_) | Value::Mapping(_) => {
                serde_yaml::to_string(value).map_err(|e| e.to_string())
            }
            scalar => Ok(format!("{}\n", scalar)),
        },
    }
}

fn cmd_get(file: &Path, path: &str, format: &str, default: Option<String>) -> ExitCode {
    let (ctx, _) = match load_context(file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match ctx.try_get(path) {
        Ok(value) => match render_value(&value, format) {
            Ok(text) => {
                print!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}: {}", "Error".red(), e);
                ExitCode::from(1)
            }
        },
        Err(e) => {
            if let Some(default_val) = default {
                println!("{}", default_val);
                ExitCode::SUCCESS
            } else {
                eprintln!("{}: {}", "Error".red(), e);
                ExitCode::from(1)
            }
        }
    }
}

fn cmd_set(
    file: &Path,
    path: &str,
    raw_value: &str,
    format: Option<&str>,
    output: Option<PathBuf>,
) -> ExitCode {
    let (mut ctx, input_format) = match load_context(file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let format = match format.map(Format::from_name).transpose() {
        Ok(f) => f.unwrap_or(input_format),
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(1);
        }
    };

    ctx.set(path, parse_value(raw_value));

    let content = match render_document(&ctx, format) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            return ExitCode::from(1);
        }
    };

    if let Some(output_path) = output {
        if let Err(e) = std::fs::write(&output_path, &content) {
            eprintln!("{}: {}", "Error writing file".red(), e);
            return ExitCode::from(2);
        }
        eprintln!("{} Wrote to {}", "✓".green(), output_path.display());
    } else {
        print!("{}", content);
    }

    ExitCode::SUCCESS
}

fn cmd_keys(file: &Path, path: &str) -> ExitCode {
    let (ctx, _) = match load_context(file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match sorted_keys(&ctx, path) {
        Ok(keys) => {
            for key in keys {
                println!("{}", key);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn sorted_keys(ctx: &Context, path: &str) -> Result<Vec<String>, Error> {
    if let Some(mut keys) = ctx.keys(path) {
        keys.sort();
        return Ok(keys);
    }

    match ctx.resolve(path) {
        Ok(value) => Err(Error::not_a_map(path, value.type_name())),
        Err(e) => Err(e),
    }
}

fn cmd_length(file: &Path, path: &str) -> ExitCode {
    match load_context(file) {
        Ok((ctx, _)) => {
            println!("{}", ctx.length(path));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.red());
            ExitCode::from(2)
        }
    }
}

fn cmd_exists(file: &Path, path: &str) -> ExitCode {
    match load_context(file) {
        Ok((ctx, _)) if ctx.exists(path) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}", e.red());
            ExitCode::from(2)
        }
    }
}

fn cmd_render(file: &Path, template: &str, strict: bool) -> ExitCode {
    let (ctx, _) = match load_context(file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let rendered = if strict {
        ctx.try_render(template)
    } else {
        Ok(ctx.render(template))
    };

    match rendered {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} Render failed\n", "✗".red());
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
