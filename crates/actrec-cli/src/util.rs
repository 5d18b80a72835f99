use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use actrec_stats::statistics::Statistics;
use anyhow::Context;

use crate::schema::snapshot::Snapshot;

/// Destination of a command's results: stdout, or a file created on open.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Opens `path` for writing, or stdout when no path is given.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        }
    }

    /// Writes `value` as pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails
    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(self.writer(), value)
            .with_context(|| format!("Failed to write JSON to {self}"))?;
        self.end_record()
    }

    /// Writes a statistics report, as aligned text or as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails
    pub fn write_statistics(&mut self, stats: &Statistics, text: bool) -> anyhow::Result<()> {
        if !text {
            return self.write_json(stats);
        }
        write!(self.writer(), "{stats}")
            .with_context(|| format!("Failed to write statistics to {self}"))?;
        self.end_record()
    }

    fn end_record(&mut self) -> anyhow::Result<()> {
        let writer = self.writer();
        writeln!(writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to flush output to {self}"))
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout(_) => f.write_str("stdout"),
            Self::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read JSON from a file, or from stdin when no path is given
///
/// # Errors
///
/// Returns error if the input cannot be read or parsed
pub fn read_json_input<T>(file_kind: &str, path: Option<&Path>) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    match path {
        Some(path) => read_json_file(file_kind, path),
        None => serde_json::from_reader(io::stdin().lock())
            .with_context(|| format!("Failed to parse {file_kind} JSON from stdin")),
    }
}

/// Read a tracker snapshot saved by `summarize --save-state`
///
/// # Errors
///
/// Returns error if file cannot be opened or parsed
pub fn read_snapshot_file<P>(path: P) -> anyhow::Result<Snapshot>
where
    P: AsRef<Path>,
{
    read_json_file("snapshot", path)
}
