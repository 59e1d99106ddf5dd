//! Export encoders: line-delimited JSON records and a CSV table.

use crate::error::Result;
use crate::models::Entry;
use serde::Serialize;

/// Export output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Jsonl,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Jsonl => "jsonl",
            ExportFormat::Csv => "csv",
        }
    }
}

/// One export record with the fixed core field set. The coordinate and
/// media fields are omitted entirely when their flag is off, and explicit
/// null when the flag is on but the entry has no value; `Option<Option<_>>`
/// with `skip_serializing_if` gives exactly that.
#[derive(Serialize)]
struct ExportRecord<'a> {
    id: u64,
    title: &'a str,
    description: &'a str,
    language: &'a str,
    category: &'a str,
    location_name: &'a str,
    timestamp: &'a str,
    contributor: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_path: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_path: Option<Option<&'a str>>,
}

impl<'a> ExportRecord<'a> {
    fn new(entry: &'a Entry, include_media: bool, include_coordinates: bool) -> Self {
        Self {
            id: entry.id,
            title: &entry.title,
            description: &entry.description,
            language: &entry.language,
            category: &entry.category,
            location_name: &entry.location_name,
            timestamp: &entry.timestamp,
            contributor: &entry.contributor,
            latitude: include_coordinates.then_some(entry.latitude),
            longitude: include_coordinates.then_some(entry.longitude),
            image_path: include_media.then_some(entry.image_path.as_deref()),
            audio_path: include_media.then_some(entry.audio_path.as_deref()),
        }
    }
}

/// Serialize entries as one JSON object per line, newline-separated.
/// Field order is fixed; non-ASCII text is preserved.
pub fn to_jsonl(entries: &[Entry], include_media: bool, include_coordinates: bool) -> Result<String> {
    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        let record = ExportRecord::new(entry, include_media, include_coordinates);
        lines.push(serde_json::to_string(&record)?);
    }
    Ok(lines.join("\n"))
}

/// Render entries as a CSV table: header row plus one row per entry,
/// RFC-4180 quoting. Absent values become empty cells.
pub fn to_csv(entries: &[Entry], include_media: bool, include_coordinates: bool) -> Result<String> {
    let mut header = vec![
        "id",
        "title",
        "description",
        "language",
        "category",
        "location_name",
        "timestamp",
        "contributor",
    ];
    if include_coordinates {
        header.extend(["latitude", "longitude"]);
    }
    if include_media {
        header.extend(["image_path", "audio_path"]);
    }

    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');

    for entry in entries {
        let mut row = vec![
            entry.id.to_string(),
            entry.title.clone(),
            entry.description.clone(),
            entry.language.clone(),
            entry.category.clone(),
            entry.location_name.clone(),
            entry.timestamp.clone(),
            entry.contributor.clone(),
        ];
        if include_coordinates {
            row.push(entry.latitude.map(|v| v.to_string()).unwrap_or_default());
            row.push(entry.longitude.map(|v| v.to_string()).unwrap_or_default());
        }
        if include_media {
            row.push(entry.image_path.clone().unwrap_or_default());
            row.push(entry.audio_path.clone().unwrap_or_default());
        }

        let cells: Vec<String> = row.iter().map(|c| csv_escape(c)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    Ok(out)
}

/// Download filename stamped with the export time.
pub fn export_filename(format: ExportFormat) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("farming_archive_{stamp}.{}", format.extension())
}

/// Quote a cell when it embeds a delimiter, quote or line break; embedded
/// quotes are doubled.
fn csv_escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
