//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use bale_core::BuildReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use std::path::PathBuf;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_pack_result(
        &self,
        output_path: &Path,
        report: &BuildReport,
        manifests: &[PathBuf],
    ) -> Result<()> {
        #[derive(Serialize)]
        struct PackOutput {
            output_path: String,
            files_added: usize,
            directories_added: usize,
            bytes_written: u64,
            bytes_compressed: u64,
            compression_ratio: f64,
            compression_percentage: f64,
            duration_ms: u128,
            checksum_manifests: Vec<String>,
        }

        let data = PackOutput {
            output_path: output_path.display().to_string(),
            files_added: report.files_added,
            directories_added: report.directories_added,
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            duration_ms: report.duration.as_millis(),
            checksum_manifests: manifests.iter().map(|p| p.display().to_string()).collect(),
        };

        let output = JsonOutput::success("pack", data);
        Self::output(&output)
    }

    fn format_manifest_result(&self, manifests: &[PathBuf]) -> Result<()> {
        #[derive(Serialize)]
        struct ManifestOutput {
            manifests: Vec<String>,
        }

        let data = ManifestOutput {
            manifests: manifests.iter().map(|p| p.display().to_string()).collect(),
        };

        let output = JsonOutput::success("checksum", data);
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_success(&self, message: &str) {
        #[derive(Serialize)]
        struct SuccessData {
            message: String,
        }

        let output = JsonOutput::success(
            "unknown",
            SuccessData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
