//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use bale_core::ArchiveFormat;
use bale_core::checksum::CHECKSUM_TOKEN;
use bale_core::create_archive;
use bale_core::write_checksum_files;
use std::path::PathBuf;

pub fn execute(args: &PackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let format = resolve_format(args);
    let dest = args.output.clone().unwrap_or_default();

    let outcome = add_archive_context(
        create_archive(args.base_path.as_deref(), &args.source, &dest, format),
        &args.source,
    )?;

    let manifests = if args.checksum.is_empty() {
        Vec::new()
    } else {
        let template = args.checksum_dest.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{}.{CHECKSUM_TOKEN}.txt", outcome.path.display()))
        });
        if args.checksum.len() > 1 && !template.to_string_lossy().contains(CHECKSUM_TOKEN) {
            bail!(
                "--checksum-dest must contain the {CHECKSUM_TOKEN} token when multiple \
                 algorithms are requested, or the manifests would overwrite each other"
            );
        }
        add_archive_context(
            write_checksum_files(
                std::slice::from_ref(&outcome.path),
                &args.checksum,
                &template,
                true,
            ),
            &args.source,
        )?
    };

    formatter.format_pack_result(&outcome.path, &outcome.report, &manifests)
}

/// Picks the archive format: explicit flag first, then the output path's
/// extension, then the tar.gz default.
fn resolve_format(args: &PackArgs) -> ArchiveFormat {
    if let Some(format) = args.format {
        return format.into();
    }
    match &args.output {
        Some(output) if output.trim_end().ends_with(".zip") => ArchiveFormat::Zip,
        _ => ArchiveFormat::TarGz,
    }
}
