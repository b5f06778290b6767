//! Circular command history with a browsing cursor.
//!
//! The ring has a fixed number of slots. The slot under the write cursor
//! always holds the empty live line, so a ring of capacity `n` remembers
//! `n - 1` entries; appending to a full ring evicts the oldest.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    entries: Vec<Option<String>>,
    write_cursor: usize,
    nav_cursor: usize,
    dedup: bool,
}

impl HistoryStore {
    /// An empty ring with `capacity` slots (at least two).
    pub fn new(capacity: usize, dedup: bool) -> Self {
        let capacity = capacity.max(2);
        let mut entries = vec![None; capacity];
        entries[0] = Some(String::new());
        Self {
            entries,
            write_cursor: 0,
            nav_cursor: 0,
            dedup,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn dedup(&self) -> bool {
        self.dedup
    }

    pub fn set_dedup(&mut self, dedup: bool) {
        self.dedup = dedup;
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    pub fn nav_cursor(&self) -> usize {
        self.nav_cursor
    }

    /// Move browsing back to the live line.
    pub fn reset_nav(&mut self) {
        self.nav_cursor = self.write_cursor;
    }

    /// Jump browsing to a slot previously read from [`nav_cursor`](Self::nav_cursor).
    pub fn set_nav(&mut self, slot: usize) {
        if slot < self.entries.len() {
            self.nav_cursor = slot;
        }
    }

    /// The entry in `slot`; the live line reads as empty.
    pub fn entry(&self, slot: usize) -> &str {
        self.entries
            .get(slot)
            .and_then(|e| e.as_deref())
            .unwrap_or("")
    }

    /// The entry under the browsing cursor.
    pub fn current(&self) -> &str {
        self.entry(self.nav_cursor)
    }

    /// Record a committed line. Returns whether it was stored.
    ///
    /// Text after the first newline is dropped. Blank lines (only spaces,
    /// tabs and newlines) are never stored, and with dedup on neither is a
    /// repeat of the newest entry. The browsing cursor always returns to
    /// the live line.
    pub fn commit(&mut self, line: &str) -> bool {
        let line = line.split('\n').next().unwrap_or("");
        let line = line.strip_suffix('\r').unwrap_or(line);
        let stored = !line.trim_start_matches([' ', '\t', '\n']).is_empty()
            && !(self.dedup && self.newest() == Some(line));

        if stored {
            let capacity = self.entries.len();
            self.entries[self.write_cursor] = Some(line.to_string());
            self.write_cursor = (self.write_cursor + 1) % capacity;
            self.entries[self.write_cursor] = Some(String::new());
        }
        self.nav_cursor = self.write_cursor;
        stored
    }

    /// Step one entry back. `None` (bell, no movement) at the oldest entry.
    pub fn prev(&mut self) -> Option<&str> {
        let capacity = self.entries.len();
        let target = (self.nav_cursor + capacity - 1) % capacity;
        if target == self.write_cursor || self.entries[target].is_none() {
            return None;
        }
        self.nav_cursor = target;
        self.entries[target].as_deref()
    }

    /// Step one entry forward, reaching the empty live line last. `None`
    /// (bell) when already on the live line.
    pub fn next(&mut self) -> Option<&str> {
        if self.nav_cursor == self.write_cursor {
            return None;
        }
        self.nav_cursor = (self.nav_cursor + 1) % self.entries.len();
        Some(self.entry(self.nav_cursor))
    }

    /// The most recently stored entry.
    pub fn newest(&self) -> Option<&str> {
        let capacity = self.entries.len();
        let slot = (self.write_cursor + capacity - 1) % capacity;
        self.entries[slot].as_deref().filter(|e| !e.is_empty())
    }

    /// Stored entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        let capacity = self.entries.len();
        (1..=capacity)
            .map(move |offset| (self.write_cursor + offset) % capacity)
            .filter_map(move |slot| self.entries[slot].as_deref())
            .filter(|e| !e.is_empty())
    }

    /// Write entries oldest first, one per line.
    pub fn save_to<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut count = 0;
        for entry in self.iter() {
            writeln!(writer, "{entry}")?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }

    /// Commit every line read from `reader`. Returns how many were stored.
    pub fn load_from<R: BufRead>(&mut self, reader: R) -> io::Result<usize> {
        let mut count = 0;
        for line in reader.lines() {
            if self.commit(&line?) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Save to a file, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<usize> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        let count = self.save_to(&mut writer)?;
        info!("saved {count} history entries to {}", path.display());
        Ok(count)
    }

    /// Append the lines of a file to the history.
    pub fn load(&mut self, path: impl AsRef<Path>) -> io::Result<usize> {
        let path = path.as_ref();
        let count = self.load_from(BufReader::new(File::open(path)?))?;
        info!("loaded {count} history entries from {}", path.display());
        debug!("history now holds {} of {} slots", self.len(), self.capacity());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store(lines: &[&str]) -> HistoryStore {
        let mut history = HistoryStore::new(8, false);
        for line in lines {
            history.commit(line);
        }
        history
    }

    #[test]
    fn test_blank_lines_not_stored() {
        let mut history = HistoryStore::new(8, false);
        assert!(!history.commit("   \t"));
        assert!(!history.commit("\n"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_trailing_newline_stripped() {
        let history = store(&["ls -l\n"]);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["ls -l"]);
    }

    #[test]
    fn test_dedup_policy() {
        let mut on = HistoryStore::new(8, true);
        on.commit("abc");
        on.commit("abc\n");
        assert_eq!(on.len(), 1);

        let mut off = HistoryStore::new(8, false);
        off.commit("abc");
        off.commit("abc");
        assert_eq!(off.len(), 2);
    }

    #[test]
    fn test_dedup_only_checks_newest() {
        let mut history = HistoryStore::new(8, true);
        history.commit("a");
        history.commit("b");
        history.commit("a");
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_prev_stops_at_oldest() {
        let mut history = store(&["one", "two"]);
        assert_eq!(history.prev(), Some("two"));
        assert_eq!(history.prev(), Some("one"));
        assert_eq!(history.prev(), None);
        assert_eq!(history.prev(), None);
        assert_eq!(history.current(), "one");
    }

    #[test]
    fn test_next_reaches_live_line() {
        let mut history = store(&["one", "two"]);
        history.prev();
        history.prev();
        assert_eq!(history.next(), Some("two"));
        assert_eq!(history.next(), Some(""));
        assert_eq!(history.next(), None);
        assert_eq!(history.nav_cursor(), history.write_cursor());
    }

    #[test]
    fn test_empty_history_navigation() {
        let mut history = HistoryStore::new(4, false);
        assert_eq!(history.prev(), None);
        assert_eq!(history.next(), None);
    }

    #[test]
    fn test_full_ring_evicts_oldest() {
        let mut history = HistoryStore::new(4, false);
        for line in ["a", "b", "c", "d", "e"] {
            history.commit(line);
        }
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["c", "d", "e"]);
        assert_eq!(history.newest(), Some("e"));
    }

    #[test]
    fn test_commit_resets_nav() {
        let mut history = store(&["one", "two"]);
        history.prev();
        history.commit("   ");
        assert_eq!(history.nav_cursor(), history.write_cursor());
    }

    #[test]
    fn test_save_and_load_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let mut history = HistoryStore::new(4, false);
        for line in ["a", "b", "c", "d"] {
            history.commit(line);
        }
        assert_eq!(history.save(&path).unwrap(), 3);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "b\nc\nd\n");

        let mut loaded = HistoryStore::new(8, false);
        assert_eq!(loaded.load(&path).unwrap(), 3);
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = HistoryStore::new(8, false);
        let err = history.load(dir.path().join("absent")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    proptest! {
        #[test]
        fn prop_prev_never_wraps_past_oldest(
            lines in proptest::collection::vec("[a-z]{1,4}", 0..20),
            capacity in 2usize..8,
        ) {
            let mut history = HistoryStore::new(capacity, false);
            for line in &lines {
                history.commit(line);
            }
            let stored: Vec<String> = history.iter().map(str::to_string).collect();
            prop_assert!(stored.len() <= capacity - 1);

            let mut seen = Vec::new();
            for _ in 0..capacity + 2 {
                match history.prev() {
                    Some(entry) => seen.push(entry.to_string()),
                    None => break,
                }
            }
            seen.reverse();
            prop_assert_eq!(&seen, &stored);

            for _ in 0..capacity + 2 {
                if history.next().is_none() {
                    break;
                }
            }
            prop_assert_eq!(history.nav_cursor(), history.write_cursor());
            prop_assert_eq!(history.current(), "");
        }
    }
}
