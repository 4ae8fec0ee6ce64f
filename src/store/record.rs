//! Question record framing
//!
//! Each question is stored as one self-delimiting record:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Question Body    | (UTF-8 JSON object)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself. The body is plain
//! JSON so `options` stays a real array on disk.

use std::io;

use super::checksum::{compute_checksum, verify_checksum};
use super::errors::StoreResult;
use crate::question::Question;

/// Length prefix plus checksum
pub(crate) const FRAME_OVERHEAD: usize = 4 + 4;

/// A framed question as written to the record file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question: Question,
}

impl QuestionRecord {
    pub fn new(question: Question) -> Self {
        Self { question }
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> StoreResult<Vec<u8>> {
        let body = serde_json::to_vec(&self.question)?;
        let record_length = (FRAME_OVERHEAD + body.len()) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        Ok(record)
    }

    /// Deserialize a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < FRAME_OVERHEAD {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length <= FRAME_OVERHEAD {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);

        if !verify_checksum(&data[..checksum_offset], stored_checksum) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Checksum mismatch",
            ));
        }

        let question: Question = serde_json::from_slice(&data[4..checksum_offset])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok((Self { question }, record_length))
    }
}
