use crate::io::IoError;
use crate::shared::{self, HubTrack};
use serde_json::Value;
use std::io::{Read, Write};

/// Reads a datahub document, which must be a JSON array of track objects.
/// Individual tracks are not validated here; the accessor tolerates any shape.
pub fn read_tracks<R: Read>(reader: R) -> Result<Vec<Value>, IoError> {
    let document: Value = serde_json::from_reader(reader)?;
    match document {
        Value::Array(tracks) => Ok(tracks),
        other => Err(IoError::NotAnArray(shared::json_type(&other))),
    }
}

/// Writes reconstructed tracks as a JSON array
pub fn write_tracks<W: Write>(writer: W, tracks: &[HubTrack], pretty: bool) -> Result<(), IoError> {
    match pretty {
        true => serde_json::to_writer_pretty(writer, tracks)?,
        false => serde_json::to_writer(writer, tracks)?,
    }
    Ok(())
}
