use crate::status::AppStatusCode;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// ErrorMsg is the payload of every error kind: a human readable
/// message and an optional posix error number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMsg {
    pub msg: String,
    pub posix_code: Option<i32>,
}

impl ErrorMsg {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorMsg {
            msg: msg.into(),
            posix_code: None,
        }
    }

    #[inline]
    pub fn with_posix_code(msg: impl Into<String>, posix_code: i32) -> Self {
        ErrorMsg {
            msg: msg.into(),
            posix_code: Some(posix_code),
        }
    }
}

impl fmt::Display for ErrorMsg {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.posix_code {
            Some(code) => write!(f, "{} (error {})", self.msg, code),
            None => write!(f, "{}", self.msg),
        }
    }
}

macro_rules! define_errors {
    ($( $id:ident : $code:ident, $name:literal => $msg:literal ; )*) => {
        #[derive(Debug, Clone, PartialEq, Eq, Error)]
        pub enum Error {
            $(
                #[error( $msg )]
                $id ( ErrorMsg )
            ),*
        }

        impl Error {
            /// Returns status code used to transfer this error.
            #[inline]
            pub fn code(&self) -> AppStatusCode {
                match self {
                    $(
                        Self::$id(..) => AppStatusCode::$code
                    ),*
                }
            }

            /// Returns readable name of the error kind.
            #[inline]
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $(
                        Self::$id(..) => $name
                    ),*
                }
            }

            #[inline]
            pub fn detail(&self) -> &ErrorMsg {
                match self {
                    $(
                        Self::$id(d) => d
                    ),*
                }
            }
        }
    }
}

define_errors! {
    NotFound: NotFound, "Not found" => "Not found: {0}";
    Corruption: Corruption, "Corruption" => "Corruption: {0}";
    NotSupported: NotSupported, "Not implemented" => "Not implemented: {0}";
    InvalidArgument: InvalidArgument, "Invalid argument" => "Invalid argument: {0}";
    IOError: IoError, "IO error" => "IO error: {0}";
    AlreadyPresent: AlreadyPresent, "Already present" => "Already present: {0}";
    RuntimeError: RuntimeError, "Runtime error" => "Runtime error: {0}";
    NetworkError: NetworkError, "Network error" => "Network error: {0}";

    // kinds below have no dedicated status code.
    SerdeError: UnknownError, "Serialize/Deserialize error" => "Serialize/Deserialize error: {0}";
    MessageTooLarge: UnknownError, "Message too large" => "Message too large: {0}";
    InvalidType: UnknownError, "Invalid type" => "Invalid type: {0}";
}

impl Error {
    #[inline]
    pub fn message(&self) -> &str {
        &self.detail().msg
    }

    #[inline]
    pub fn posix_code(&self) -> Option<i32> {
        self.detail().posix_code
    }

    #[inline]
    pub fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(ErrorMsg::new(msg))
    }

    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(ErrorMsg::new(msg))
    }

    #[inline]
    pub fn runtime_error(msg: impl Into<String>) -> Self {
        Error::RuntimeError(ErrorMsg::new(msg))
    }
}

impl From<rowwire_catalog::error::Error> for Error {
    #[inline]
    fn from(src: rowwire_catalog::error::Error) -> Self {
        Error::invalid_argument(src.to_string())
    }
}

impl From<rowwire_datatype::error::Error> for Error {
    #[inline]
    fn from(src: rowwire_datatype::error::Error) -> Self {
        Error::InvalidType(ErrorMsg::new(src.to_string()))
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(src: std::io::Error) -> Self {
        Error::IOError(ErrorMsg {
            msg: src.to_string(),
            posix_code: src.raw_os_error(),
        })
    }
}

impl From<bincode::error::EncodeError> for Error {
    #[inline]
    fn from(src: bincode::error::EncodeError) -> Self {
        Error::SerdeError(ErrorMsg::new(src.to_string()))
    }
}

impl From<bincode::error::DecodeError> for Error {
    #[inline]
    fn from(src: bincode::error::DecodeError) -> Self {
        Error::SerdeError(ErrorMsg::new(src.to_string()))
    }
}
