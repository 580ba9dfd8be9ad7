//! Gzip framing for request and response bodies.

use crate::error::AppError;
use flate2::{bufread::GzDecoder, write::GzEncoder, Compression};
use serde::Serialize;
use std::io::{self, Read, Write};

/// Inflates a gzip body. Concatenated members are read as one stream.
///
/// Errors raised before the first member's header has been parsed, including
/// an empty body, surface as [`AppError::GzipReader`]; anything after that,
/// trailing garbage behind a complete member included, as
/// [`AppError::GzipBody`].
pub fn gunzip(body: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut inflated = Vec::new();
    let mut remaining = body;
    let mut first_member = true;

    loop {
        let mut decoder = GzDecoder::new(remaining);
        let result = decoder.read_to_end(&mut inflated);
        let header_parsed = decoder.header().is_some();

        let err = match result {
            Ok(_) if header_parsed => None,
            Ok(_) => Some(io::Error::new(io::ErrorKind::UnexpectedEof, "EOF")),
            Err(e) => Some(e),
        };
        if let Some(e) = err {
            return Err(if first_member && !header_parsed {
                AppError::GzipReader(e)
            } else {
                AppError::GzipBody(e)
            });
        }

        remaining = decoder.into_inner();
        if remaining.is_empty() {
            return Ok(inflated);
        }
        first_member = false;
    }
}

/// Serializes `value` as a newline-terminated JSON document and compresses it.
///
/// The whole body is produced in memory so nothing reaches the wire if
/// encoding fails.
pub fn gzip_json<T: Serialize>(value: &T) -> Result<Vec<u8>, AppError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    serde_json::to_writer(&mut encoder, value)
        .map_err(|e| AppError::ResponseEncoding(e.into()))?;
    encoder
        .write_all(b"\n")
        .map_err(AppError::ResponseEncoding)?;
    encoder.finish().map_err(AppError::ResponseEncoding)
}
