//! CLI argument parsing using clap.

use bale_core::ArchiveFormat;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bale")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package a file or directory into an archive
    Pack(PackArgs),
    /// Write checksum manifests for existing files
    Checksum(ChecksumArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// File or directory to archive
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output archive path (default: source basename plus extension)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Archive format (default: inferred from OUTPUT, falling back to tar-gz)
    #[arg(short, long, value_enum)]
    pub format: Option<PackFormat>,

    /// Directory whose prefix is stripped from entry names
    #[arg(short, long, value_name = "DIR")]
    pub base_path: Option<PathBuf>,

    /// Checksum algorithm for the produced archive (can be repeated)
    #[arg(short, long, value_name = "ALGO")]
    pub checksum: Vec<String>,

    /// Manifest path template; CHECKSUM is replaced by the algorithm name
    #[arg(long, value_name = "TEMPLATE")]
    pub checksum_dest: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ChecksumArgs {
    /// Files to hash
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Digest algorithm (can be repeated)
    #[arg(short, long, value_name = "ALGO", required = true)]
    pub algorithm: Vec<String>,

    /// Manifest path template; CHECKSUM is replaced by the algorithm name
    #[arg(short, long, value_name = "TEMPLATE")]
    pub dest: PathBuf,

    /// Label entries with the path as given instead of the basename
    #[arg(long)]
    pub full_paths: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_name = "SHELL")]
    pub shell: clap_complete::Shell,
}

/// Output archive format as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PackFormat {
    /// Gzip-compressed tar stream
    TarGz,
    /// Zip archive
    Zip,
}

impl From<PackFormat> for ArchiveFormat {
    fn from(format: PackFormat) -> Self {
        match format {
            PackFormat::TarGz => Self::TarGz,
            PackFormat::Zip => Self::Zip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pack_format_mapping() {
        assert_eq!(ArchiveFormat::from(PackFormat::TarGz), ArchiveFormat::TarGz);
        assert_eq!(ArchiveFormat::from(PackFormat::Zip), ArchiveFormat::Zip);
    }
}
