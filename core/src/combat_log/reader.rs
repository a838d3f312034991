use std::fs;
use std::io::SeekFrom;
use std::path::PathBuf;

use memchr::memchr_iter;
use memmap2::Mmap;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::{Duration, sleep};

use super::error::ReaderError;
use crate::session::{RaidSession, SessionParser};

const TAIL_SLEEP_DURATION: Duration = Duration::from_millis(100);

pub struct Reader {
    path: PathBuf,
}

impl Reader {
    pub fn new(path: PathBuf) -> Self {
        Reader { path }
    }

    /// Parse a complete log file into a fresh session.
    ///
    /// Lines are fed to the parser strictly in file order - registry
    /// updates, effect intervals and event ordering all depend on the
    /// sequential pass. Returns the session and the end byte position
    /// (the resume point for tailing).
    pub fn parse_file(&self) -> Result<(RaidSession, u64), ReaderError> {
        let file = fs::File::open(&self.path).map_err(|source| ReaderError::OpenFile {
            path: self.path.clone(),
            source,
        })?;
        let mmap = unsafe {
            Mmap::map(&file).map_err(|source| ReaderError::MemoryMap {
                path: self.path.clone(),
                source,
            })?
        };
        let bytes = mmap.as_ref();
        let end_pos = bytes.len() as u64;

        let mut parser = SessionParser::new();
        let mut start = 0;
        for end in memchr_iter(b'\n', bytes) {
            if end > start {
                let line = String::from_utf8_lossy(&bytes[start..end]);
                parser.process_line(&line);
            }
            start = end + 1;
        }
        if start < bytes.len() {
            let line = String::from_utf8_lossy(&bytes[start..]);
            parser.process_line(&line);
        }

        Ok((parser.finish(), end_pos))
    }

    /// Tail a live log file from `start_pos`, feeding complete lines into
    /// the given parser. Runs until the file handle fails; incomplete
    /// trailing lines are kept buffered until their newline arrives.
    pub async fn tail_into(
        &self,
        start_pos: u64,
        parser: &mut SessionParser,
        mut on_line: impl FnMut(&SessionParser),
    ) -> Result<(), ReaderError> {
        let file = File::open(&self.path)
            .await
            .map_err(|source| ReaderError::OpenFile {
                path: self.path.clone(),
                source,
            })?;
        let mut reader = BufReader::new(file);
        reader
            .seek(SeekFrom::Start(start_pos))
            .await
            .map_err(|source| ReaderError::ReadFile {
                path: self.path.clone(),
                source,
            })?;

        let mut buf = Vec::new();
        loop {
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => sleep(TAIL_SLEEP_DURATION).await,
                Ok(_) => {
                    if buf.ends_with(b"\n") {
                        let line = String::from_utf8_lossy(&buf);
                        parser.process_line(&line);
                        on_line(parser);
                        buf.clear();
                    }
                    // Partial line: the next read appends to it.
                }
                Err(source) => {
                    return Err(ReaderError::ReadFile {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }
    }
}
