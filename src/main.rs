use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use env_logger::Env;

use astgraph::backend::{self, visualize::OutputFormat, visualize::RenderOptions};
use astgraph::document;
use astgraph::json_format::Separators;
use astgraph::{FlattenOptions, Mode, Result, SaveOptions};

#[derive(Debug, Parser)]
#[command(name = "astgraph", version, author)]
#[command(about = "Flattens Python syntax trees into JSON and renders them as tree graphs.")]
struct Cli {
    /// Log what is going on. Useful for debugging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a Python file and print its flattened AST.
    PrintFile {
        file: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
    },
    /// Parse a Python file and save its flattened AST as JSON.
    SaveFile {
        file: PathBuf,
        #[arg(short, long, value_name = "JSON")]
        output: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Parse Python source given on the command line and print its flattened AST.
    PrintSource {
        code: String,
        #[command(flatten)]
        parse: ParseArgs,
    },
    /// Parse Python source given on the command line and save its flattened AST as JSON.
    SaveSource {
        code: String,
        #[arg(short, long, value_name = "JSON")]
        output: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Render a saved AST as a tree graph with the help of Graphviz.
    Visualize {
        json: PathBuf,
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,
        /// Which document of the file to render, the last one by default.
        #[arg(long)]
        entry: Option<usize>,
        #[arg(long, default_value = "AST Tree")]
        title: String,
        #[arg(long, default_value = "dot", value_name = "PROGRAM")]
        dot_program: String,
        /// Also print the coordinates Graphviz assigned to every vertex.
        #[arg(long)]
        layout: bool,
    },
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[arg(short, long, value_enum, default_value_t = Mode::Exec)]
    mode: Mode,
    #[arg(long, default_value_t = FlattenOptions::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl ParseArgs {
    fn options(&self) -> FlattenOptions {
        FlattenOptions {
            mode: self.mode,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Args)]
struct SaveArgs {
    /// Append to the output file instead of overwriting it.
    #[arg(short, long)]
    append: bool,
    #[arg(long)]
    indent: Option<usize>,
    #[arg(long, requires = "key_separator")]
    item_separator: Option<String>,
    #[arg(long, requires = "item_separator")]
    key_separator: Option<String>,
}

impl SaveArgs {
    fn options(&self) -> SaveOptions {
        let separators = match (&self.item_separator, &self.key_separator) {
            (Some(item), Some(key)) => Some(Separators::new(item, key)),
            _ => None,
        };
        SaveOptions {
            append: self.append,
            indent: self.indent,
            separators,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    if let Err(err) = Runner::new(&cli).run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}

/// Simple struct responsible for dispatching a subcommand to the library.
struct Runner<'a> {
    args: &'a Cli,
}

impl<'a> Runner<'a> {
    fn new(args: &'a Cli) -> Self {
        Self { args }
    }

    fn run(&self) -> Result<()> {
        match &self.args.command {
            Command::PrintFile { file, parse } => document::print_parse_file(file, &parse.options()),
            Command::SaveFile {
                file,
                output,
                parse,
                save,
            } => document::parse_file_with_save(file, output, &parse.options(), &save.options()),
            Command::PrintSource { code, parse } => {
                document::print_parse_source(code, &parse.options())
            }
            Command::SaveSource {
                code,
                output,
                parse,
                save,
            } => document::parse_source_with_save(code, output, &parse.options(), &save.options()),
            Command::Visualize {
                json,
                output,
                format,
                entry,
                title,
                dot_program,
                layout,
            } => {
                let options = RenderOptions {
                    format: *format,
                    title: title.clone(),
                    dot_program: dot_program.clone(),
                };
                let (graph, positions) =
                    backend::visualize_saved(json, *entry, output, &options, *layout)?;
                println!("{}", graph.summary());
                if let Some(positions) = positions {
                    for (i, point) in positions.positions.iter().enumerate() {
                        println!("{}:\t{} ({:.2}, {:.2})", i, graph.vertices[i].name, point.x, point.y);
                    }
                }
                Ok(())
            }
        }
    }
}
