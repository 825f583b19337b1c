//! Checksum command implementation.

use crate::cli::ChecksumArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use bale_core::checksum::CHECKSUM_TOKEN;
use bale_core::write_checksum_files;

pub fn execute(args: &ChecksumArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    if args.algorithm.len() > 1 && !args.dest.to_string_lossy().contains(CHECKSUM_TOKEN) {
        bail!(
            "--dest must contain the {CHECKSUM_TOKEN} token when multiple algorithms are \
             requested, or the manifests would overwrite each other"
        );
    }

    let manifests = add_archive_context(
        write_checksum_files(&args.files, &args.algorithm, &args.dest, !args.full_paths),
        &args.files[0],
    )?;

    formatter.format_manifest_result(&manifests)
}
