use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use nyasharp::ast::Ast;
use nyasharp::ast_printer::AstPrinter;
use nyasharp::callable::NativeFunction;
use nyasharp::error::NyaError;
use nyasharp::interpreter::Interpreter;
use nyasharp::natives;
use nyasharp::parser::Parser;
use nyasharp::reporter::ConsoleReporter;
use nyasharp::scanner::Scanner;
use nyasharp::session::{RunStatus, Session};
use nyasharp::value::Value;

/// Exit code for a malformed command line.
const EXIT_USAGE: i32 = 64;
/// Exit code for scan, parse and resolve errors.
const EXIT_STATIC: i32 = 65;
/// Exit code for runtime errors.
const EXIT_RUNTIME: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "nya language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to the log file
    #[arg(long, global = true)]
    log: bool,

    /// Where `--log` writes its records
    #[arg(long, global = true, default_value = "nyasharp.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints every top-level statement as an S-expression
    Parse { filename: PathBuf },

    /// Runs a `.nya` script
    Run { filename: PathBuf },

    /// Reads and runs lines interactively (the default)
    Repl,
}

/// Maps a file and validates it as UTF-8.
fn read_source(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).with_context(|| format!("Failed to open file {:?}", filename))?;

    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file {:?}", filename))?
        .len();

    if len == 0 {
        info!("{:?} is empty", filename);
        return Ok(String::new());
    }

    // SAFETY: the map is read once into an owned String and dropped before
    // the function returns.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {:?}", filename))?;

    let source = std::str::from_utf8(&map)
        .map_err(NyaError::from)
        .with_context(|| format!("{:?} is not valid UTF-8", filename))?
        .to_string();

    info!("Read {} bytes from {:?}", source.len(), filename);

    Ok(source)
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    // `[module:line] - message`, crate prefix stripped
    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("nyasharp::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

/// `inpwut(prompt)`: show `prompt` (unless `nuww`) and read one line.
/// Returns `nuww` at end of input.
fn inpwut(_: &mut Interpreter, args: &[Value]) -> std::result::Result<Value, String> {
    let mut stdout = io::stdout();

    if let Some(prompt) = args.first().filter(|v| **v != Value::Nil) {
        write!(stdout, "{}", prompt).map_err(|e| e.to_string())?;
        stdout.flush().map_err(|e| e.to_string())?;
    }

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| e.to_string())?;

    if read == 0 {
        return Ok(Value::Nil);
    }

    Ok(Value::String(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn session() -> Session {
    let mut natives = natives::standard();
    natives.push(NativeFunction::new("inpwut", 1, inpwut));

    Session::with_interpreter(Interpreter::with_natives(
        Box::new(ConsoleReporter),
        natives,
    ))
}

fn tokenize(filename: &Path, json: bool) -> Result<()> {
    info!("Running Tokenize subcommand");

    let source = read_source(filename)?;
    let mut tokens = Vec::new();
    let mut tokenized = true;

    for item in Scanner::new(&source) {
        match item {
            Ok(token) => {
                debug!("Scanned token: {}", token);

                if !json {
                    println!("{}", token);
                }

                tokens.push(token);
            }

            Err(e) => {
                tokenized = false;
                debug!("Tokenization debug: {}", e);
                eprintln!("{}", e);
            }
        }
    }

    if json {
        let out = serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?;
        println!("{}", out);
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code {}", EXIT_STATIC);
        std::process::exit(EXIT_STATIC);
    }

    info!("Tokenization completed successfully");
    Ok(())
}

fn parse(filename: &Path) -> Result<()> {
    info!("Running Parse subcommand");

    let source = read_source(filename)?;
    let (tokens, mut errors) = nyasharp::scanner::scan(&source);

    let mut ast = Ast::new();
    let parsed = Parser::new(&tokens, &mut ast).parse();
    errors.extend(parsed.errors);

    if !errors.is_empty() {
        for e in &errors {
            debug!("Parse debug: {}", e);
            eprintln!("{}", e);
        }
        std::process::exit(EXIT_STATIC);
    }

    let printer = AstPrinter::new(&ast);
    for stmt in parsed.statements.iter().flatten() {
        let rendered = printer.print_stmt(stmt);
        debug!("AST: {}", rendered);
        println!("{}", rendered);
    }

    info!("Parse subcommand completed");
    Ok(())
}

fn run(filename: &Path) -> Result<()> {
    info!("Running Run subcommand");

    if filename.extension().and_then(|ext| ext.to_str()) != Some("nya") {
        eprintln!(
            "UwU! Sow sowwy. It wooks wike ywou mwade a fucky wucky. {:?} is not .nya :c",
            filename
        );
        std::process::exit(EXIT_USAGE);
    }

    let source = read_source(filename)?;

    match session().run(&source) {
        RunStatus::Ok => {
            info!("Program executed successfully");
            Ok(())
        }

        RunStatus::StaticError => std::process::exit(EXIT_STATIC),

        RunStatus::RuntimeError => std::process::exit(EXIT_RUNTIME),
    }
}

fn repl() -> Result<()> {
    info!("Starting REPL");

    let mut session = session();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "> ").context("Failed to write prompt")?;
        stdout.flush().context("Failed to flush prompt")?;

        line.clear();
        if stdin.lock().read_line(&mut line).context("Failed to read line")? == 0 {
            break;
        }

        let status = session.run(&line);
        debug!("REPL line finished with {:?}", status);
    }

    info!("REPL finished");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger(&args.log_file)?;
    } else {
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands.unwrap_or(Commands::Repl) {
        Commands::Tokenize { filename, json } => tokenize(&filename, json),
        Commands::Parse { filename } => parse(&filename),
        Commands::Run { filename } => run(&filename),
        Commands::Repl => repl(),
    }
}
