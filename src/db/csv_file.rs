use std::io::Read;
use std::path::{Path, PathBuf};

use crate::{
    db::{RatingSource, RatingStore},
    error::{AppError, AppResult},
    models::Rating,
};

/// Delimited `user,item,rating` file
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    has_headers: bool,
    delimiter: u8,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            has_headers: false,
            delimiter: b',',
        }
    }

    pub fn has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parses ratings from any reader using this source's format
    pub fn read_from<R: Read>(&self, reader: R) -> AppResult<RatingStore> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut store = RatingStore::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let rating = parse_record(&record, line)?;
            store.insert(rating.user, rating.item, rating.value);
        }

        Ok(store)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    line: u64,
) -> AppResult<&'r str> {
    record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("line {}: missing {}", line, name)))
}

fn parse_record(record: &csv::StringRecord, line: u64) -> AppResult<Rating> {
    let user = field(record, 0, "user", line)?;
    let item = field(record, 1, "item", line)?;
    let raw = field(record, 2, "rating", line)?;

    let value: f64 = raw.parse().map_err(|_| {
        AppError::InvalidInput(format!("line {}: rating '{}' is not a number", line, raw))
    })?;
    if !value.is_finite() {
        return Err(AppError::InvalidInput(format!(
            "line {}: rating '{}' is not finite",
            line, raw
        )));
    }

    Ok(Rating::new(user, item, value))
}

#[async_trait::async_trait]
impl RatingSource for CsvSource {
    async fn load(&self) -> AppResult<RatingStore> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || -> AppResult<RatingStore> {
            let file = std::fs::File::open(&source.path)?;
            source.read_from(file)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
