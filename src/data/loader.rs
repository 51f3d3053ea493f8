use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use log::{debug, info};

use crate::error::{DataError, Result};

use super::model::{RecordTable, Value};

// ---------------------------------------------------------------------------
// DataSource – where a report's table comes from
// ---------------------------------------------------------------------------

/// A tabular data source. The three report variants (bundled file, configured
/// path, user upload) collapse into one loader polymorphic over this tag.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// CSV text compiled into the binary.
    Bundled {
        name: &'static str,
        csv: &'static str,
    },
    /// CSV file on disk.
    Path(PathBuf),
    /// User-supplied byte stream. `None` until the user provides one.
    Upload {
        name: String,
        bytes: Option<Vec<u8>>,
    },
}

impl DataSource {
    /// Stable identity of the source, used as the table-cache key. Changing
    /// the uploaded bytes changes the identity, which invalidates the cache.
    pub fn identity(&self) -> SourceId {
        match self {
            DataSource::Bundled { name, .. } => SourceId::Bundled(name.to_string()),
            DataSource::Path(p) => SourceId::Path(p.clone()),
            DataSource::Upload { name, bytes } => SourceId::Upload {
                name: name.clone(),
                fingerprint: bytes.as_ref().map(|b| (b.len() as u64, fnv1a(b))),
            },
        }
    }

    /// Short human-readable label for log lines and error messages.
    pub fn label(&self) -> String {
        match self {
            DataSource::Bundled { name, .. } => (*name).to_string(),
            DataSource::Path(p) => p.display().to_string(),
            DataSource::Upload { name, .. } => name.clone(),
        }
    }
}

/// Cache key derived from a [`DataSource`]. Carries the source kind and name
/// structurally; an upload's identity includes a fingerprint of its bytes
/// (`None` while pending).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceId {
    Bundled(String),
    Path(PathBuf),
    Upload {
        name: String,
        fingerprint: Option<(u64, u64)>,
    },
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Bundled(name) => write!(f, "bundled:{name}"),
            SourceId::Path(path) => write!(f, "path:{}", path.display()),
            SourceId::Upload {
                name,
                fingerprint: None,
            } => write!(f, "upload:{name} (pending)"),
            SourceId::Upload {
                name,
                fingerprint: Some((len, hash)),
            } => write!(f, "upload:{name} ({len} bytes, {hash:016x})"),
        }
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

// ---------------------------------------------------------------------------
// LoadOutcome – table, or "waiting for an upload"
// ---------------------------------------------------------------------------

/// Result of attempting a load. An upload source with no bytes yet is not an
/// error; the surface shows a neutral waiting state and computes nothing.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Table(RecordTable),
    AwaitingUpload,
}

impl LoadOutcome {
    pub fn table(&self) -> Option<&RecordTable> {
        match self {
            LoadOutcome::Table(t) => Some(t),
            LoadOutcome::AwaitingUpload => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a record table from a source. `required_columns` are checked against
/// the (trimmed) header row so a missing column surfaces here as a
/// [`DataError::SchemaMismatch`] instead of failing deep inside an
/// aggregation.
pub fn load(source: &DataSource, required_columns: &[&str]) -> Result<LoadOutcome> {
    let table = match source {
        DataSource::Bundled { csv, .. } => parse_csv(csv.as_bytes())?,
        DataSource::Path(path) => {
            let file = std::fs::File::open(path).map_err(|e| DataError::DataUnavailable {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            parse_csv(file)?
        }
        DataSource::Upload { bytes: None, .. } => {
            debug!("source '{}' awaiting upload", source.label());
            return Ok(LoadOutcome::AwaitingUpload);
        }
        DataSource::Upload {
            bytes: Some(bytes), ..
        } => parse_csv(bytes.as_slice())?,
    };

    for col in required_columns {
        if !table.has_column(col) {
            return Err(DataError::SchemaMismatch {
                column: (*col).to_string(),
                source_name: source.label(),
            });
        }
    }

    info!(
        "loaded '{}': {} rows, {} columns",
        source.label(),
        table.len(),
        table.columns().len()
    );
    Ok(LoadOutcome::Table(table))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per data row.
/// Column labels are trimmed of leading/trailing whitespace; cell dtypes are
/// guessed per value (integer, then float, else string; empty → null).
fn parse_csv<R: Read>(reader: R) -> Result<RecordTable> {
    let mut reader = csv::Reader::from_reader(reader);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RecordTable::new(columns, rows))
}

fn guess_cell_type(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    Value::String(s.to_string())
}
