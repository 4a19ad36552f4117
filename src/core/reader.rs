//! Record reader - groups decoded fields into separator-delimited records

use std::io::{self, BufRead};

use super::format::{decode_line, Field};

/// Fields of one record, in first-seen order
///
/// Keys are unique within a record; a repeated key overwrites the earlier
/// value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: Option<String>) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Value of a field; `Some(None)` when the field holds the null token
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read every remaining line into records
///
/// The returned list always ends with the open record that follows the last
/// separator (empty for well-formed multi-record files). Multi-record callers
/// use [`closed_records`]; single-record callers take the first entry.
/// Bytes that are not valid UTF-8 are replaced, so a bad line never aborts
/// the read.
pub fn read_records<R: BufRead>(mut reader: R) -> io::Result<Vec<Record>> {
    let mut records = vec![Record::new()];
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        match decode_line(&line) {
            Some(Field::Separator) => records.push(Record::new()),
            Some(Field::Value { key, value }) => {
                if let Some(current) = records.last_mut() {
                    current.insert(key, value);
                }
            }
            None => {}
        }
    }

    Ok(records)
}

/// Records terminated by a separator; the trailing open record is dropped
pub fn closed_records(records: &[Record]) -> &[Record] {
    match records.split_last() {
        Some((_, closed)) => closed,
        None => records,
    }
}
