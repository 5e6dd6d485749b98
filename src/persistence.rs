use crate::error::Result;
use crate::summary::AggregatedTable;
use crate::table::{Layout, ObservationTable};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub fn read_table(path: &Path, layout: Layout) -> Result<ObservationTable> {
    let file = File::open(path)?;
    ObservationTable::from_reader(BufReader::new(file), layout)
}

pub fn dump_summary(path: &Path, summary: &AggregatedTable) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    info!("wrote summary to {}", path.display());

    Ok(())
}

pub fn chart_path(input: &Path, output_dir: &Path) -> PathBuf {
    output_path(input, output_dir, "svg")
}

pub fn summary_path(input: &Path, output_dir: &Path) -> PathBuf {
    output_path(input, output_dir, "json")
}

/// `<output_dir>/<input file stem>.<extension>`
fn output_path(input: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let mut name = input
        .file_stem()
        .unwrap_or(input.as_os_str())
        .to_os_string();
    name.push(".");
    name.push(extension);
    output_dir.join(name)
}
