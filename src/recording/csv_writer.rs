//! CSV writer for episode summaries.
//!
//! Format: episode_id,started_at,finished_at,black,white,plies,winner

use crate::recording::episode_record::{EpisodeRecord, EpisodeSummary};
use crate::Result;
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Appends one row per finished episode, rotating to a new file each day.
pub struct CsvWriter {
    base_dir: PathBuf,
    current_file: Option<csv::Writer<File>>,
    current_date: String,
}

impl CsvWriter {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;

        Ok(Self {
            base_dir,
            current_file: None,
            current_date: String::new(),
        })
    }

    fn date_string() -> String {
        Utc::now().format("%Y%m%d").to_string()
    }

    pub fn file_path_for(&self, date: &str) -> PathBuf {
        self.base_dir.join(format!("episodes_{}.csv", date))
    }

    /// File the next row goes to.
    pub fn current_path(&self) -> PathBuf {
        self.file_path_for(&Self::date_string())
    }

    fn ensure_file_open(&mut self) -> Result<&mut csv::Writer<File>> {
        let today = Self::date_string();

        if self.current_date != today {
            if let Some(mut writer) = self.current_file.take() {
                writer.flush()?;
            }
        }

        let writer = match self.current_file.take() {
            Some(writer) => writer,
            None => {
                let file_path = self.file_path_for(&today);
                // Header only on an empty file, so appending across runs stays valid.
                let needs_header = fs::metadata(&file_path).map(|m| m.len() == 0).unwrap_or(true);
                let file = OpenOptions::new().create(true).append(true).open(&file_path)?;
                self.current_date = today;
                csv::WriterBuilder::new()
                    .has_headers(needs_header)
                    .from_writer(file)
            }
        };

        Ok(self.current_file.insert(writer))
    }

    pub fn write_episode(&mut self, record: &EpisodeRecord) -> Result<()> {
        let summary = record.summary();
        let writer = self.ensure_file_open()?;
        writer.serialize(&summary)?;
        writer.flush()?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.current_file.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for CsvWriter {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Loads every summary row from a file written by [`CsvWriter`].
pub fn load_summaries<P: AsRef<Path>>(path: P) -> Result<Vec<EpisodeSummary>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut summaries = Vec::new();
    for row in reader.deserialize() {
        summaries.push(row?);
    }
    Ok(summaries)
}
