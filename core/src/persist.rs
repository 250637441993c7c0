use crate::error::IndexError;
use crate::{DocId, InvertedIndex, Posting, TermId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub type Dictionary = (HashMap<String, TermId>, Vec<u32>);

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u64,
    pub created_at: String,
    pub version: u32,
}

/// Locations of every file under an index root.
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    pub fn titles(&self) -> PathBuf { self.root.join("titles.bin") }
    pub fn body(&self) -> PostingPaths { PostingPaths::new(self.root.join("body")) }
    pub fn title(&self) -> PostingPaths { PostingPaths::new(self.root.join("title")) }
    pub fn anchor(&self) -> PostingPaths { PostingPaths::new(self.root.join("anchor")) }

    /// Where a pagerank table may live, in lookup order.
    pub fn pagerank_candidates(&self) -> Vec<PathBuf> {
        ["signals/pagerank.bin", "pagerank.bin", "pr/pagerank.bin"]
            .iter()
            .map(|rel| self.root.join(rel))
            .collect()
    }

    /// Where a pageview table may live, in lookup order.
    pub fn pageviews_candidates(&self) -> Vec<PathBuf> {
        [
            "signals/wid2pv.bin",
            "signals/pageviews.bin",
            "pageviews/wid2pv.bin",
            "wid2pv.bin",
            "pageviews.bin",
        ]
        .iter()
        .map(|rel| self.root.join(rel))
        .collect()
    }
}

/// Locations of one posting index (body, title or anchor).
pub struct PostingPaths {
    pub root: PathBuf,
}

impl PostingPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn dictionary(&self) -> PathBuf { self.root.join("dictionary.bin") }
    fn postings_dir(&self) -> PathBuf { self.root.join("postings") }
    pub fn postings_for_term(&self, term_id: TermId) -> PathBuf {
        self.postings_dir().join(format!("{term_id:08}.postings.bin"))
    }
    pub fn exists(&self) -> bool { self.dictionary().is_file() }
}

fn write_bincode<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IndexError> {
    if let Some(dir) = path.parent() {
        create_dir_all(dir).map_err(|e| IndexError::io(dir, e))?;
    }
    let f = File::create(path).map_err(|e| IndexError::io(path, e))?;
    let mut w = BufWriter::new(f);
    bincode::serialize_into(&mut w, value).map_err(|e| IndexError::codec(path, e))?;
    w.flush().map_err(|e| IndexError::io(path, e))
}

fn read_bincode<T: DeserializeOwned>(path: &Path) -> Result<T, IndexError> {
    let f = File::open(path).map_err(|e| IndexError::io(path, e))?;
    bincode::deserialize_from(BufReader::new(f)).map_err(|e| IndexError::codec(path, e))
}

pub fn save_dictionary(paths: &PostingPaths, dict: &Dictionary) -> Result<(), IndexError> {
    write_bincode(&paths.dictionary(), dict)
}

pub fn load_dictionary(paths: &PostingPaths) -> Result<Dictionary, IndexError> {
    read_bincode(&paths.dictionary())
}

pub fn save_postings_for_term(paths: &PostingPaths, term_id: TermId, postings: &[Posting]) -> Result<(), IndexError> {
    write_bincode(&paths.postings_for_term(term_id), postings)
}

/// Open a postings file for streaming. `Ok(None)` when the file does not exist.
pub fn open_postings_for_term(paths: &PostingPaths, term_id: TermId) -> Result<Option<PostingReader>, IndexError> {
    PostingReader::open(paths.postings_for_term(term_id))
}

/// Write an in-memory index in the on-disk posting layout.
pub fn save_index(paths: &PostingPaths, index: &InvertedIndex) -> Result<(), IndexError> {
    save_dictionary(paths, &(index.dictionary.clone(), index.df.clone()))?;
    for (term_id, postings) in &index.postings {
        save_postings_for_term(paths, *term_id, postings)?;
    }
    Ok(())
}

pub fn save_titles(paths: &IndexPaths, titles: &HashMap<DocId, String>) -> Result<(), IndexError> {
    write_bincode(&paths.titles(), titles)
}

pub fn load_titles(paths: &IndexPaths) -> Result<HashMap<DocId, String>, IndexError> {
    read_bincode(&paths.titles())
}

pub fn save_signal<V: Serialize>(path: &Path, table: &HashMap<DocId, V>) -> Result<(), IndexError> {
    write_bincode(path, table)
}

pub fn load_signal<V: DeserializeOwned>(path: &Path) -> Result<HashMap<DocId, V>, IndexError> {
    read_bincode(path)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<(), IndexError> {
    let path = paths.meta();
    create_dir_all(&paths.root).map_err(|e| IndexError::io(&paths.root, e))?;
    let json = serde_json::to_string_pretty(meta).map_err(|e| IndexError::json(&path, e))?;
    std::fs::write(&path, json).map_err(|e| IndexError::io(&path, e))
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile, IndexError> {
    let path = paths.meta();
    let buf = std::fs::read_to_string(&path).map_err(|e| IndexError::io(&path, e))?;
    serde_json::from_str(&buf).map_err(|e| IndexError::json(&path, e))
}

/// Decodes a bincode `Vec<Posting>` one record at a time.
pub struct PostingReader {
    path: PathBuf,
    reader: BufReader<File>,
    remaining: u64,
}

impl PostingReader {
    fn open(path: PathBuf) -> Result<Option<Self>, IndexError> {
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IndexError::io(path, e)),
        };
        let mut reader = BufReader::new(file);
        // bincode prefixes sequences with a u64 length
        let remaining: u64 = bincode::deserialize_from(&mut reader).map_err(|e| IndexError::codec(&path, e))?;
        Ok(Some(Self { path, reader, remaining }))
    }

    pub fn remaining(&self) -> u64 { self.remaining }
}

impl Iterator for PostingReader {
    type Item = Result<Posting, IndexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match bincode::deserialize_from(&mut self.reader) {
            Ok(posting) => Some(Ok(posting)),
            Err(e) => {
                self.remaining = 0;
                Some(Err(IndexError::codec(self.path.clone(), e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn postings_stream_back_in_order() {
        let dir = tempdir().unwrap();
        let paths = PostingPaths::new(dir.path());
        let postings = vec![Posting { doc_id: 9, tf: 1 }, Posting { doc_id: 2, tf: 5 }];
        save_postings_for_term(&paths, 3, &postings).unwrap();

        let reader = open_postings_for_term(&paths, 3).unwrap().unwrap();
        assert_eq!(reader.remaining(), 2);
        let read: Vec<Posting> = reader.map(Result::unwrap).collect();
        assert_eq!(read, postings);
    }

    #[test]
    fn missing_postings_file_is_none() {
        let dir = tempdir().unwrap();
        let paths = PostingPaths::new(dir.path());
        assert!(open_postings_for_term(&paths, 0).unwrap().is_none());
    }

    #[test]
    fn truncated_postings_file_surfaces_decode_error() {
        let dir = tempdir().unwrap();
        let paths = PostingPaths::new(dir.path());
        save_postings_for_term(&paths, 0, &[Posting { doc_id: 1, tf: 1 }]).unwrap();
        let file = paths.postings_for_term(0);
        let bytes = std::fs::read(&file).unwrap();
        std::fs::write(&file, &bytes[..bytes.len() - 2]).unwrap();

        let mut reader = open_postings_for_term(&paths, 0).unwrap().unwrap();
        assert!(matches!(reader.next(), Some(Err(IndexError::Codec { .. }))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn meta_round_trips_through_json() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path());
        save_meta(&paths, &MetaFile { num_docs: 42, created_at: "2024-01-01T00:00:00Z".into(), version: 1 }).unwrap();
        assert_eq!(load_meta(&paths).unwrap().num_docs, 42);
    }
}
