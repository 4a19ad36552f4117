//! Versioned envelope - `version:<major>.<minor>` followed by the payload
//!
//! Every container implements [`SaveableContainer`]; the provided `save` and
//! `load` methods are the boundary the UI calls. They never return an error:
//! failures are logged and posted to the player, and the caller only learns
//! whether the operation succeeded.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, error, info};

use super::constants::{BYTE_ORDER_MARK, SEPARATOR, VERSION_KEY, VERSION_KEY_WRITTEN};
use super::format::{decode_line, Field, FieldWriter};
use super::traits::{MessageKind, MessageSink};

// =============================================================================
// VERSION
// =============================================================================

/// Format version of one container type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// The file does not start with a usable version field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadHeader {
    /// Nothing readable on the first line
    EmptyFile,
    /// First field is not `version`
    MissingVersion { found: String },
    /// Version differs from the container's own
    UnsupportedVersion { expected: String, found: String },
}

impl fmt::Display for BadHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadHeader::EmptyFile => write!(f, "Trying to read from an empty file"),
            BadHeader::MissingVersion { found } => {
                write!(f, "Missing header line. Expected \"version\", got: {}", found)
            }
            BadHeader::UnsupportedVersion { expected, found } => write!(
                f,
                "Unsupported version. Expected \"{}\", got: {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for BadHeader {}

/// Failure of a whole save or load
#[derive(Debug)]
pub enum ContainerError {
    Io(io::Error),
    BadHeader(BadHeader),
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::Io(e) => write!(f, "IO error: {}", e),
            ContainerError::BadHeader(e) => write!(f, "Bad header: {}", e),
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Io(e) => Some(e),
            ContainerError::BadHeader(e) => Some(e),
        }
    }
}

impl From<io::Error> for ContainerError {
    fn from(e: io::Error) -> Self {
        ContainerError::Io(e)
    }
}

impl From<BadHeader> for ContainerError {
    fn from(e: BadHeader) -> Self {
        ContainerError::BadHeader(e)
    }
}

// =============================================================================
// HEADER
// =============================================================================

/// Consume the first line and check it against `expected`
pub fn read_header<R: BufRead>(reader: &mut R, expected: Version) -> Result<(), ContainerError> {
    let mut first = Vec::new();
    if reader.read_until(b'\n', &mut first)? == 0 {
        return Err(BadHeader::EmptyFile.into());
    }
    let line = String::from_utf8_lossy(&first);
    let line = line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line.as_ref());

    let (key, value) = match decode_line(line) {
        None => return Err(BadHeader::EmptyFile.into()),
        Some(Field::Separator) => {
            return Err(BadHeader::MissingVersion {
                found: SEPARATOR.to_string(),
            }
            .into())
        }
        Some(Field::Value { key, value }) => (key, value),
    };

    if !key.eq_ignore_ascii_case(VERSION_KEY) {
        return Err(BadHeader::MissingVersion { found: key }.into());
    }

    let expected = expected.to_string();
    if value.as_deref() != Some(expected.as_str()) {
        return Err(BadHeader::UnsupportedVersion {
            expected,
            found: value.unwrap_or_default(),
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// CONTAINER
// =============================================================================

/// Save/load unit binding one record shape to one live game object
pub trait SaveableContainer {
    /// Short name used in log lines
    const NAME: &'static str;

    fn version(&self) -> Version;

    /// Where player-facing messages go
    fn messages(&self) -> &dyn MessageSink;

    /// Write the payload (everything after the version line)
    fn save_fields<W: Write>(&self, writer: &mut FieldWriter<W>) -> io::Result<()>;

    /// Interpret the payload and apply it to the target
    fn load_fields<R: BufRead>(&mut self, reader: R) -> io::Result<()>;

    /// Write the versioned file contents
    fn write_to<W: Write>(&self, writer: W) -> io::Result<()> {
        let mut writer = FieldWriter::new(writer);
        writer.write_field(VERSION_KEY_WRITTEN, self.version())?;
        self.save_fields(&mut writer)?;
        writer.flush()
    }

    /// Validate the header, then hand the rest to [`Self::load_fields`]
    ///
    /// The target is untouched when the header is rejected.
    fn read_from<R: BufRead>(&mut self, mut reader: R) -> Result<(), ContainerError> {
        read_header(&mut reader, self.version())?;
        self.load_fields(reader)?;
        Ok(())
    }

    /// Save to `path`, reporting the outcome to the log and the player
    ///
    /// A partially written file is left in place on failure.
    fn save(&self, path: &Path) -> bool {
        let result = File::create(path).and_then(|file| self.write_to(BufWriter::new(file)));
        match result {
            Ok(()) => {
                info!(path = %path.display(), "[{}] Saved settings", Self::NAME);
                self.messages()
                    .message("Saved settings!", MessageKind::TaskCompletion);
                true
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "[{}] Failed to save", Self::NAME);
                self.messages().message(
                    &format!("Failed to save to file \"{}\": {}", path.display(), e),
                    MessageKind::RejectInput,
                );
                false
            }
        }
    }

    /// Load from `path`, reporting the outcome to the log and the player
    fn load(&mut self, path: &Path) -> bool {
        debug!(path = %path.display(), "[{}] Loading", Self::NAME);
        let result = File::open(path)
            .map_err(ContainerError::from)
            .and_then(|file| self.read_from(BufReader::new(file)));
        match result {
            Ok(()) => {
                info!(path = %path.display(), "[{}] Loaded settings", Self::NAME);
                self.messages()
                    .message("Loaded settings!", MessageKind::TaskCompletion);
                true
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "[{}] Failed to load", Self::NAME);
                self.messages().message(
                    &format!("Failed to load from file \"{}\": {}", path.display(), e),
                    MessageKind::RejectInput,
                );
                false
            }
        }
    }
}
