//
// Errors
//
use std::error;
use std::fs::File;
use std::fmt;
use std::io;
use std::num;
use std::path::Path;
use std::result;
use ndarray as nd;

/// Type alias for depcontexts errors
pub type Result<X> = result::Result<X, Error>;

/// Wrapper for many kinds of errors occuring while preparing a corpus
#[derive(Debug)]
pub enum Error {
    /// A token record or pair line could not be split into the fields we need
    MalformedRecord { line: usize, reason: String },
    /// A token names a head outside of its own sentence
    OutOfRangeHead { sentence: usize, position: usize, head: usize, len: usize },
    MissingFile(&'static str, Option<io::Error>),
    IOError(io::Error),
    Json(serde_json::Error),
    ParseFloatError(num::ParseFloatError),
    ShapeError(nd::ShapeError),
    /// The external trainer ran but did not succeed
    Trainer(String),
    Config(String),
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MalformedRecord { line, ref reason } => {
                write!(f, "Malformed record on line {}: {}", line, reason)
            }
            Error::OutOfRangeHead { sentence, position, head, len } => write!(
                f,
                "Token {} of sentence {} has head {}, but the sentence only has {} tokens",
                position, sentence, head, len
            ),
            Error::MissingFile(ref info, ref opt_err) => {
                write!(f,
                    "The {} must already exist at this point but there was a problem opening it. \
                    Wrong directory? Maybe missed a step? The OS error was: ",
                    info)?;
                if let Some(ref err) = *opt_err { write!(f, "{}", err) }
                else { write!(f, "Unknown") }
            },
            Error::IOError(ref err) => write!(f, "IO error: {}", err),
            Error::Json(ref err) => write!(f, "JSON error: {}", err),
            Error::ParseFloatError(ref err) => write!(f, "Error parsing float: {}", err),
            Error::ShapeError(ref err) => write!(f, "NDArray shape error: {:?}", err),
            Error::Trainer(ref info) => write!(f, "Trainer failed: {}", info),
            Error::Config(ref info) => write!(f, "Configuration error: {}", info),
            Error::Other(ref info) => write!(f, "{}", info),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::MissingFile(_, Some(ref err)) => Some(err),
            Error::IOError(ref err) => Some(err),
            Error::Json(ref err) => Some(err),
            Error::ParseFloatError(ref err) => Some(err),
            Error::ShapeError(ref err) => Some(err),
            _ => None,
        }
    }
}

//
// Convert everything else into Error
//
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IOError(err)
    }
}
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
impl From<num::ParseFloatError> for Error {
    fn from(err: num::ParseFloatError) -> Self {
        Error::ParseFloatError(err)
    }
}
impl From<nd::ShapeError> for Error {
    fn from(err: nd::ShapeError) -> Self {
        Error::ShapeError(err)
    }
}

//
// Convert Error into a general io Error
//
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

/// Open a file a previous stage should have written, or complain about which one is missing
pub fn open_existing<P: AsRef<Path>>(path: P, what: &'static str) -> Result<File> {
    File::open(path.as_ref()).map_err(|err| Error::MissingFile(what, Some(err)))
}
