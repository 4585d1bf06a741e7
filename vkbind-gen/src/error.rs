use thiserror::Error;

/// Error kinds named in `spec.md` §7. `OutOfMemory` and `FileTooBig` are
/// kept for parity with the error table the original tool exposes, even
/// though Rust's allocator makes them effectively unreachable here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("out of memory")]
    OutOfMemory,

    #[error("file too big: {path}")]
    FileTooBig { path: String },

    #[error("failed to open file `{path}`: {source}")]
    FailedToOpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read file `{path}`: {source}")]
    FailedToReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file `{path}`: {source}")]
    FailedToWriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] vkreg::ParseError),

    #[error("unresolved dependency: {kind} `{name}`")]
    DependencyUnresolved { kind: &'static str, name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
