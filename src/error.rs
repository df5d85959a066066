use thiserror::Error;

use crate::decode::DecodeError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Archive entry not found: {0}")]
    EntryNotFound(String),
    #[error("Error parsing XML document {entry}: {err}")]
    Xml {
        entry: String,
        #[source]
        err: roxmltree::Error,
    },
    #[error("Error decoding field `{field}` of {record} `{id}`: {err}")]
    Decode {
        record: &'static str,
        id: String,
        field: &'static str,
        #[source]
        err: DecodeError,
    },
    #[error("Missing required field `{field}` on {record} `{id}`")]
    MissingField {
        record: &'static str,
        id: String,
        field: &'static str,
    },
    #[error("Table {entry} contains no records")]
    EmptyTable { entry: String },
    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
