use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Read;
use std::path::Path;

#[derive(Serialize, Deserialize, Default)]
struct StoredPositions {
    scroll_offsets: HashMap<String, u16>,
}

/// Remembers how far into each article the user has read. The search query
/// is deliberately never stored here.
#[cfg_attr(test, mockall::automock)]
pub trait ReadingPositions {
    fn store_position(&mut self, article_id: String, offset: u16) -> anyhow::Result<()>;
    fn get_position(&self, article_id: &str) -> anyhow::Result<Option<u16>>;
}

fn read_positions<P: AsRef<Path>>(path: P) -> anyhow::Result<StoredPositions> {
    if !path.as_ref().exists() {
        return Ok(StoredPositions::default());
    }
    let mut file = OpenOptions::new()
        .read(true)
        .open(path)
        .context("Failed to open file")?;
    let mut file_content = String::new();
    file.read_to_string(&mut file_content)
        .context("Failed to read from file")?;
    if file_content.is_empty() {
        Ok(StoredPositions::default())
    } else {
        serde_json::from_str(&file_content).context("Failed to parse json")
    }
}

fn write_positions<P: AsRef<Path>>(path: P, positions: &StoredPositions) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        create_dir_all(parent).context("Failed to create parent directories")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .context("Failed to open file")?;
    serde_json::to_writer_pretty(file, positions).context("Failed to write json")?;
    Ok(())
}

#[derive(Copy, Clone)]
pub struct ReadingPositionsPath<P>(pub P);

impl<P> ReadingPositions for ReadingPositionsPath<P>
where
    P: AsRef<Path>,
{
    fn store_position(&mut self, article_id: String, offset: u16) -> anyhow::Result<()> {
        let mut positions =
            read_positions(self.0.as_ref()).context("Failed to read reading positions")?;
        positions.scroll_offsets.insert(article_id, offset);
        write_positions(self.0.as_ref(), &positions)
    }

    fn get_position(&self, article_id: &str) -> anyhow::Result<Option<u16>> {
        Ok(read_positions(self.0.as_ref())
            .context("Failed to read reading positions")?
            .scroll_offsets
            .get(article_id)
            .copied())
    }
}

impl<P> ReadingPositions for Option<P>
where
    P: ReadingPositions,
{
    fn store_position(&mut self, article_id: String, offset: u16) -> anyhow::Result<()> {
        if let Some(inner_self) = self {
            inner_self.store_position(article_id, offset)
        } else {
            Ok(())
        }
    }

    fn get_position(&self, article_id: &str) -> anyhow::Result<Option<u16>> {
        if let Some(inner_self) = self {
            inner_self.get_position(article_id)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadingPositions, ReadingPositionsPath};
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    const JSON: &str = "{\"scroll_offsets\": {\"etl-pipelines\": 12}}";

    fn create_positions_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(JSON.as_bytes()).unwrap();
        file
    }

    #[test]
    fn get_position_when_the_file_does_not_exist() {
        let path = ReadingPositionsPath(Path::new("/does/not/exist"));
        let offset = path.get_position("etl-pipelines").unwrap();
        assert!(offset.is_none());
    }

    #[test]
    fn get_position_for_an_article_that_is_not_stored() {
        let file = create_positions_file();
        let path = ReadingPositionsPath(file.path());
        let offset = path.get_position("java-basics").unwrap();
        assert!(offset.is_none());
    }

    #[test]
    fn get_position_for_an_article_that_is_stored() {
        let file = create_positions_file();
        let path = ReadingPositionsPath(file.path());
        let offset = path.get_position("etl-pipelines").unwrap();
        assert_eq!(Some(12), offset);
    }

    #[test]
    fn store_position_and_get_position() {
        let file = NamedTempFile::new().unwrap();
        let mut path = ReadingPositionsPath(file.path());
        path.store_position("etl-pipelines".to_string(), 4).unwrap();
        path.store_position("java-basics".to_string(), 31).unwrap();
        assert_eq!(Some(4), path.get_position("etl-pipelines").unwrap());
        assert_eq!(Some(31), path.get_position("java-basics").unwrap());
    }

    #[test]
    fn a_missing_store_reads_nothing_and_stores_nothing() {
        let mut store: Option<ReadingPositionsPath<&Path>> = None;
        store.store_position("etl-pipelines".to_string(), 4).unwrap();
        assert!(store.get_position("etl-pipelines").unwrap().is_none());
    }
}
