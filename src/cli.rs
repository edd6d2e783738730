//! CLI argument definitions for porter.
//!
//! Separated from the binary entrypoint to keep `main.rs` focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Install porter packages.
#[derive(Parser, Debug)]
#[command(name = "porter")]
#[command(version, about = "Porter, a source-vendoring package installer")]
#[command(long_about = concat!(
    "Porter, a source-vendoring package installer.\n\n",
    "Porter reads a porter.json manifest, fetches each declared package at its ",
    "pinned tag, wraps the package's source files in namespace scopes derived ",
    "from the dependency chain, and installs them under a local porter/ ",
    "directory. Each installed package's own dependencies are resolved the ",
    "same way, recursively.\n\n",
    "The directory used must contain a valid porter.json file.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install packages for the project in the current directory:\n",
    "    $ porter install\n\n",
    "  Install packages for a project elsewhere:\n",
    "    $ porter install /path/to/project\n\n",
    "  Abort on malformed package references instead of skipping them:\n",
    "    $ porter install --strict\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install porter packages (default when no subcommand given).
    Install(InstallArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone)]
pub struct InstallArgs {
    /// Directory containing the root porter.json [default: current directory].
    #[arg(value_name = "PATH")]
    pub path: Option<Utf8PathBuf>,

    /// Treat malformed package references as fatal instead of skipping them.
    #[arg(long)]
    pub strict: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,

    /// Abandon a fetch that takes longer than this many seconds.
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    pub fetch_timeout: u64,

    /// Source file extension to wrap and install.
    #[arg(long, value_name = "EXT", default_value = "cs")]
    pub source_ext: String,
}

impl Default for InstallArgs {
    fn default() -> Self {
        Self {
            path: None,
            strict: false,
            quiet: false,
            fetch_timeout: 300,
            source_ext: "cs".to_owned(),
        }
    }
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments;
    /// otherwise the flattened top-level arguments.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            None => &self.install,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_invocation_with_defaults() {
        let cli = Cli::parse_from(["porter"]);
        let args = cli.install_args();
        assert!(args.path.is_none());
        assert!(!args.strict);
        assert!(!args.quiet);
        assert_eq!(args.fetch_timeout, 300);
        assert_eq!(args.source_ext, "cs");
    }

    #[test]
    fn parses_install_subcommand_with_path() {
        let cli = Cli::parse_from(["porter", "install", "/proj", "--strict", "-q"]);
        let args = cli.install_args();
        assert_eq!(args.path.as_deref(), Some(camino::Utf8Path::new("/proj")));
        assert!(args.strict);
        assert!(args.quiet);
    }

    #[test]
    fn parses_fetch_timeout_override() {
        let cli = Cli::parse_from(["porter", "install", "--fetch-timeout", "30"]);
        assert_eq!(cli.install_args().fetch_timeout, 30);
    }

    #[test]
    fn parses_source_extension_override() {
        let cli = Cli::parse_from(["porter", "--source-ext", "vb"]);
        assert_eq!(cli.install_args().source_ext, "vb");
    }
}
