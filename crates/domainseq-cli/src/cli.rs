use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Domainseq Developers",
    version,
    about = "domainseq - generate, filter and score DNA domain sequences with a nearest-neighbor energy model.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a sequence set, run the configured filters and write the survivors.
    Generate(GenerateArgs),
    /// Compute the duplex energy of every sequence in a set.
    Energy(EnergyArgs),
    /// Find the longest or strongest common window for every pair of two sets.
    Match(MatchArgs),
    /// Produce candidate domains of several lengths inside an energy window.
    Prefilter(PrefilterArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path for the output sequence list.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to a TOML configuration file with `[generate]` and `[[filters]]` sections.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Source Overrides ---
    /// Sequence length; enumerates every sequence unless --sample-count is given.
    #[arg(short = 'n', long, value_name = "INT", conflicts_with = "input")]
    pub length: Option<usize>,

    /// Restrict generation to these symbols (e.g. "ACT").
    #[arg(short, long, value_name = "SYMBOLS")]
    pub alphabet: Option<String>,

    /// Draw this many random sequences instead of enumerating.
    #[arg(long, value_name = "INT")]
    pub sample_count: Option<usize>,

    /// Read the initial set from a sequence list instead of generating it.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Seed for the random source (sampling, shuffling, Hamming filter).
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Shuffle the set right after construction.
    #[arg(long)]
    pub shuffle: bool,

    /// Nearest-neighbor parameter file in TOML format.
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    // --- Filter Shortcuts (applied after the configured filters) ---
    /// Lower bound of the duplex energy window (kcal/mol).
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true, requires = "high_dg")]
    pub low_dg: Option<f64>,

    /// Upper bound of the duplex energy window (kcal/mol).
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true, requires = "low_dg")]
    pub high_dg: Option<f64>,

    /// Temperature in degrees Celsius for the energy window.
    #[arg(short, long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Remove sequences containing GGGG or CCCC.
    #[arg(long)]
    pub exclude_quadruplexes: bool,

    /// Greedily keep sequences at least this Hamming distance apart.
    #[arg(long, value_name = "INT")]
    pub hamming: Option<usize>,

    /// Fail instead of writing an empty set.
    #[arg(long)]
    pub require_nonempty: bool,
}

/// Arguments for the `energy` subcommand.
#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// Input sequence list.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output CSV file; defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Temperature in degrees Celsius.
    #[arg(short, long, value_name = "FLOAT", default_value_t = 37.0)]
    pub temperature: f64,

    /// Nearest-neighbor parameter file in TOML format.
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Longest common substring.
    Longest,
    /// Strongest Watson-Crick window against the partner's reverse complement.
    Strongest,
}

/// Arguments for the `match` subcommand.
#[derive(Args, Debug)]
pub struct MatchArgs {
    /// First sequence list (rows of the result grid).
    #[arg(short = 'a', long, required = true, value_name = "PATH")]
    pub first: PathBuf,

    /// Second sequence list (columns of the result grid).
    #[arg(short = 'b', long, required = true, value_name = "PATH")]
    pub second: PathBuf,

    /// Scoring mode.
    #[arg(short, long, value_enum, default_value_t = MatchMode::Longest)]
    pub mode: MatchMode,

    /// Temperature in degrees Celsius for the strongest mode.
    #[arg(short, long, value_name = "FLOAT", default_value_t = 37.0)]
    pub temperature: f64,

    /// Output CSV file; defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Nearest-neighbor parameter file in TOML format.
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,
}

/// Arguments for the `prefilter` subcommand.
#[derive(Args, Debug)]
pub struct PrefilterArgs {
    /// Domain lengths to generate.
    #[arg(short, long, value_delimiter = ',', default_values_t = [10, 11])]
    pub lengths: Vec<usize>,

    /// Lower bound of the duplex energy window (kcal/mol).
    #[arg(long, required = true, value_name = "FLOAT", allow_hyphen_values = true)]
    pub low_dg: f64,

    /// Upper bound of the duplex energy window (kcal/mol).
    #[arg(long, required = true, value_name = "FLOAT", allow_hyphen_values = true)]
    pub high_dg: f64,

    /// Temperature in degrees Celsius.
    #[arg(short, long, value_name = "FLOAT", default_value_t = 37.0)]
    pub temperature: f64,

    /// Require C/G ends with an A/T within two bases of each end.
    #[arg(long)]
    pub end_gc: bool,

    /// Directory receiving one `domains_<length>.txt` per length.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Nearest-neighbor parameter file in TOML format.
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn prefilter_parses_comma_separated_lengths_and_negative_bounds() {
        let cli = Cli::parse_from([
            "domainseq",
            "prefilter",
            "--lengths",
            "8,9",
            "--low-dg",
            "-9.6",
            "--high-dg",
            "-9.0",
            "-o",
            "out",
        ]);
        let Commands::Prefilter(args) = cli.command else {
            panic!("Expected 'prefilter' subcommand");
        };
        assert_eq!(args.lengths, vec![8, 9]);
        assert_eq!(args.low_dg, -9.6);
        assert_eq!(args.temperature, 37.0);
    }

    #[test]
    fn match_mode_defaults_to_longest() {
        let cli = Cli::parse_from(["domainseq", "match", "-a", "x.txt", "-b", "y.txt"]);
        let Commands::Match(args) = cli.command else {
            panic!("Expected 'match' subcommand");
        };
        assert_eq!(args.mode, MatchMode::Longest);
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::parse_from(["domainseq", "energy", "-i", "in.txt", "-vv", "-j", "2"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(2));
    }
}
