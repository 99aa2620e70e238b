
//! Error type definitions.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::io::ErrorKind;

/// Re-exports of the standard io error and result.
pub use std::io::Error as IoError;
pub use std::io::Result as IoResult;

/// A result that may contain an error from this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A result that contains nothing on success and an error from this crate otherwise.
pub type UnitResult = Result<()>;


/// An error that may happen while compressing or decompressing an image.
/// Distinguishes between unsupported features, invalid data,
/// values that do not fit their declared bit width, and file system errors.
#[derive(Debug)]
pub enum Error {

    /// The content uses features that are not supported by this implementation.
    NotSupported(Cow<'static, str>),

    /// The contents are not valid: some input does not respect the format.
    Invalid(Cow<'static, str>),

    /// A value does not fit into the bit width of its destination field.
    /// Packing reports this as its own condition so that a caller
    /// could widen the field or clamp the value instead of aborting.
    Overflow(Cow<'static, str>),

    /// The underlying byte stream could not be read or written.
    Io(IoError),
}

impl Error {

    /// Create an error of the variant `Invalid`.
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Invalid(message.into())
    }

    /// Create an error of the variant `NotSupported`.
    pub(crate) fn unsupported(message: impl Into<Cow<'static, str>>) -> Self {
        Error::NotSupported(message.into())
    }

    /// Create an error of the variant `Overflow`.
    pub(crate) fn overflow(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Overflow(message.into())
    }
}

/// Enable using the `?` operator on `std::io::Result`.
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        if error.kind() == ErrorKind::UnexpectedEof {
            Error::invalid("reference to missing bytes")
        }
        else {
            Error::Io(error)
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(error) => error.fmt(formatter),
            Error::NotSupported(message) => write!(formatter, "not supported: {}", message),
            Error::Invalid(message) => write!(formatter, "invalid: {}", message),
            Error::Overflow(message) => write!(formatter, "overflow: {}", message),
        }
    }
}
