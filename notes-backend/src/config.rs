use clap::Parser;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "NOTES_HOST";
    pub const PORT: &str = "NOTES_PORT";
    pub const CACHE_DIR: &str = "NOTES_CACHE_DIR";
}

/// Command-line options. Every option can also come from the environment
/// (or a `.env` file).
#[derive(Parser, Debug)]
#[command(name = "notes-backend", version, about = "Plain-text notes over HTTP")]
#[command(disable_help_flag = true)]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(short = 'h', long, env = env_vars::HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = env_vars::PORT)]
    port: u16,

    /// Directory holding the note files (created if missing)
    #[arg(short, long, env = env_vars::CACHE_DIR)]
    cache: PathBuf,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cache_dir: PathBuf,
}

impl Config {
    /// Parse the process arguments, exiting with usage on error
    pub fn from_args() -> Self {
        Self::try_parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse an explicit argument list
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Args::try_parse_from(args).map(Self::from)
    }

    /// Base URL the server is reachable at
    pub fn server_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            cache_dir: args.cache,
        }
    }
}
