use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Local;
use tracing::info;

use crate::error::Result;

/// Directory exports land in unless told otherwise.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Write `markdown` to `<dir>/itinerary_<YYYYmmdd_HHMMSS>.md`, creating `dir`
/// if needed, and return the written path.
///
/// Two exports within the same second overwrite each other.
pub fn export_markdown(markdown: &str, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(export_file_name(Local::now()));
    fs::write(&path, markdown)?;

    info!(target: "travel_buddy::export", path = %path.display(), bytes = markdown.len(), "exported itinerary");
    Ok(path)
}

fn export_file_name<Tz>(now: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("itinerary_{}.md", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_export_file_name() {
        let at = Utc.with_ymd_and_hms(2025, 10, 3, 7, 5, 9).unwrap();
        assert_eq!(export_file_name(at), "itinerary_20251003_070509.md");
    }
}
