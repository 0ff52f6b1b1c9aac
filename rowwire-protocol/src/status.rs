use crate::error::{Error, ErrorMsg, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code carried in an application-level response.
///
/// Codes are transferred as plain numbers, any number not
/// listed here is read as [`AppStatusCode::UnknownError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum AppStatusCode {
    Ok,
    NotFound,
    Corruption,
    NotSupported,
    InvalidArgument,
    IoError,
    AlreadyPresent,
    RuntimeError,
    NetworkError,
    UnknownError,
}

impl AppStatusCode {
    #[inline]
    pub fn num(self) -> u32 {
        match self {
            AppStatusCode::Ok => 0,
            AppStatusCode::NotFound => 1,
            AppStatusCode::Corruption => 2,
            AppStatusCode::NotSupported => 3,
            AppStatusCode::InvalidArgument => 4,
            AppStatusCode::IoError => 5,
            AppStatusCode::AlreadyPresent => 6,
            AppStatusCode::RuntimeError => 7,
            AppStatusCode::NetworkError => 8,
            AppStatusCode::UnknownError => 999,
        }
    }
}

impl From<u32> for AppStatusCode {
    #[inline]
    fn from(src: u32) -> Self {
        match src {
            0 => AppStatusCode::Ok,
            1 => AppStatusCode::NotFound,
            2 => AppStatusCode::Corruption,
            3 => AppStatusCode::NotSupported,
            4 => AppStatusCode::InvalidArgument,
            5 => AppStatusCode::IoError,
            6 => AppStatusCode::AlreadyPresent,
            7 => AppStatusCode::RuntimeError,
            8 => AppStatusCode::NetworkError,
            _ => AppStatusCode::UnknownError,
        }
    }
}

impl From<AppStatusCode> for u32 {
    #[inline]
    fn from(src: AppStatusCode) -> Self {
        src.num()
    }
}

impl fmt::Display for AppStatusCode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppStatusCode::Ok => "OK",
            AppStatusCode::NotFound => "NOT_FOUND",
            AppStatusCode::Corruption => "CORRUPTION",
            AppStatusCode::NotSupported => "NOT_SUPPORTED",
            AppStatusCode::InvalidArgument => "INVALID_ARGUMENT",
            AppStatusCode::IoError => "IO_ERROR",
            AppStatusCode::AlreadyPresent => "ALREADY_PRESENT",
            AppStatusCode::RuntimeError => "RUNTIME_ERROR",
            AppStatusCode::NetworkError => "NETWORK_ERROR",
            AppStatusCode::UnknownError => "UNKNOWN_ERROR",
        };
        f.write_str(s)
    }
}

/// AppStatus is the transmittable form of an operation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatus {
    pub code: AppStatusCode,
    pub message: Option<String>,
    pub posix_code: Option<i32>,
}

impl AppStatus {
    #[inline]
    pub fn ok() -> Self {
        AppStatus {
            code: AppStatusCode::Ok,
            message: None,
            posix_code: None,
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.code == AppStatusCode::Ok
    }

    /// Convert status back to result.
    pub fn into_result(self) -> Result<()> {
        let msg = self.message.unwrap_or_default();
        let detail = ErrorMsg {
            msg,
            posix_code: self.posix_code,
        };
        let err = match self.code {
            AppStatusCode::Ok => return Ok(()),
            AppStatusCode::NotFound => Error::NotFound(detail),
            AppStatusCode::Corruption => Error::Corruption(detail),
            AppStatusCode::NotSupported => Error::NotSupported(detail),
            AppStatusCode::InvalidArgument => Error::InvalidArgument(detail),
            AppStatusCode::IoError => Error::IOError(detail),
            AppStatusCode::AlreadyPresent => Error::AlreadyPresent(detail),
            AppStatusCode::RuntimeError => Error::RuntimeError(detail),
            AppStatusCode::NetworkError => Error::NetworkError(detail),
            AppStatusCode::UnknownError => {
                log::warn!("Unknown error code in status: {}", detail);
                Error::RuntimeError(ErrorMsg {
                    msg: format!("(unknown error code): {}", detail.msg),
                    posix_code: detail.posix_code,
                })
            }
        };
        Err(err)
    }
}

impl From<&Error> for AppStatus {
    fn from(err: &Error) -> Self {
        let code = err.code();
        let message = if code == AppStatusCode::UnknownError {
            log::warn!(
                "Unknown error code translation from internal error {}: sending UNKNOWN_ERROR",
                err
            );
            format!("{}: {}", err.kind_name(), err.message())
        } else {
            err.message().to_string()
        };
        AppStatus {
            code,
            message: Some(message),
            posix_code: err.posix_code(),
        }
    }
}

impl<T> From<&Result<T>> for AppStatus {
    #[inline]
    fn from(res: &Result<T>) -> Self {
        match res {
            Ok(_) => AppStatus::ok(),
            Err(e) => AppStatus::from(e),
        }
    }
}
