//! jsondb CLI Client
//!
//! Command-line interface for interacting with a jsondb server.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use jsondb_client::protocol::decode_value;
use jsondb_client::{Client, Config, Environment, KeyValueStore, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// jsondb CLI
#[derive(Parser, Debug)]
#[command(name = "jsondb-cli")]
#[command(about = "CLI for the jsondb key-value server")]
#[command(version)]
struct Args {
    /// Server host (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Password for the AUTH handshake (overrides SERVER_PASSWORD)
    #[arg(long)]
    password: Option<String>,

    /// Explicit env file to load instead of searching for jsondb/.env.<environment>
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Environment whose env file to load
    #[arg(short, long)]
    environment: Option<Environment>,

    /// Connect/read/write timeout in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Log protocol traffic
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value; `42`, `true`, `null` and JSON objects/arrays are typed,
        /// anything else is stored as a string
        value: String,

        /// Expire after this many seconds
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        ttl: i64,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Show the remaining time-to-live of a key
    Ttl {
        /// The key to inspect
        key: String,
    },

    /// Ping the server
    Ping,

    /// Read commands from stdin, one per line
    Shell,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "info,jsondb_client=debug"
    } else {
        "warn,jsondb_client=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    tracing::debug!("Using server {}", config.addr());

    let client = Client::connect_with(config).context("failed to connect")?;
    let store: &dyn KeyValueStore = &client;

    match args.command {
        Commands::Get { key } => print_value(store.get(&key)?),
        Commands::Set { key, value, ttl } => {
            let ok = store.set_with_ttl(&key, parse_value(&value), ttl)?;
            println!("{}", if ok { "OK" } else { "FAILED" });
        }
        Commands::Del { key } => println!("{}", if store.del(&key)? { 1 } else { 0 }),
        Commands::Ttl { key } => println!("{}", store.ttl(&key)?),
        Commands::Ping => println!("{}", client.ping()?),
        Commands::Shell => shell(store)?,
    }

    store.close();
    Ok(())
}

/// env file (explicit or discovered), then process environment, then flags
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match (&args.env_file, args.environment) {
        (Some(path), _) => Config::from_env_file(path)?,
        (None, Some(environment)) => Config::discover(environment, std::env::current_dir()?)?,
        (None, None) => Config::discover(Environment::Development, std::env::current_dir()?)
            .unwrap_or_else(|e| {
                tracing::debug!("{}; using defaults", e);
                Config::default()
            }),
    };
    config = config.with_env_overrides()?;

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(password) = &args.password {
        config.password = Some(jsondb_client::config::strip_quotes(password).to_string());
    }
    if let Some(ms) = args.timeout_ms {
        config.connect_timeout_ms = ms;
        config.read_timeout_ms = ms;
        config.write_timeout_ms = ms;
    }
    Ok(config)
}

/// Interpret a literal the way a GET reply would be decoded
fn parse_value(text: &str) -> Value {
    decode_value(text).unwrap_or_else(|| Value::String(text.to_string()))
}

fn print_value(value: Option<Value>) {
    match value {
        None => println!("(nil)"),
        Some(Value::String(s)) => println!("{}", s),
        Some(other) => println!("{}", other),
    }
}

fn shell(store: &dyn KeyValueStore) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        match line {
            "" => {}
            "quit" | "exit" => break,
            _ => {
                if let Err(e) = shell_command(store, line) {
                    println!("error: {:#}", e);
                }
            }
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}

fn shell_command(store: &dyn KeyValueStore, line: &str) -> anyhow::Result<()> {
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match verb.to_ascii_lowercase().as_str() {
        "get" => print_value(store.get(rest)?),
        "set" => {
            let (key, value) = rest.split_once(' ').context("usage: set <key> <value>")?;
            println!("{}", store.set(key, parse_value(value.trim()))?);
        }
        "setex" => {
            let mut parts = rest.splitn(3, ' ');
            let (Some(key), Some(seconds), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
                bail!("usage: setex <key> <seconds> <value>");
            };
            let seconds: i64 = seconds.parse().context("seconds must be an integer")?;
            println!("{}", store.set_with_ttl(key, parse_value(value.trim()), seconds)?);
        }
        "del" => println!("{}", store.del(rest)?),
        "ttl" => println!("{}", store.ttl(rest)?),
        "ping" => print_value(store.get(jsondb_client::network::PING_KEY)?),
        other => bail!("unknown command: {} (get, set, setex, del, ttl, ping, quit)", other),
    }
    Ok(())
}
