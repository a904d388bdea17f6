use std::error::Error as _;
use thiserror::Error;
use tracing::error;
use validify::ValidationErrors;

pub mod http;

#[derive(Debug, Error)]
pub enum ShelfErr {
    #[error("Does not exist; {0}")]
    DoesNotExist(String),

    #[error("Invalid file; {0}")]
    InvalidFile(String),

    #[error("Missing field; {0}")]
    MissingField(String),

    #[error("No data; {0}")]
    NoData(String),

    #[error("Validation; {0}")]
    Validation(#[from] ValidationErrors),

    #[error("IO; {0}")]
    IO(#[from] std::io::Error),

    #[error("SQL; {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Multipart; {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Query; {0}")]
    Query(#[from] axum::extract::rejection::QueryRejection),
}

#[derive(Debug, Error)]
#[error("{error}")]
pub struct ShelfError {
    file: &'static str,
    line: u32,
    column: u32,
    pub error: ShelfErr,
}

impl ShelfError {
    pub fn new(file: &'static str, line: u32, column: u32, error: ShelfErr) -> ShelfError {
        ShelfError {
            file,
            line,
            column,
            error,
        }
    }

    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }

    pub fn print(&self) {
        let location = self.location();

        error!("{location} | {self}");

        if self.error.source().is_some() {
            error!("Causes:");
        }

        let mut src = self.error.source();
        while let Some(source) = src {
            error!(" - {source}");
            src = source.source();
        }
    }
}

/// Return early with a [ShelfError] of the given [ShelfErr] variant, capturing the location.
#[macro_export]
macro_rules! err {
    ($ty:ident $(, $l:literal $(,)? $($args:expr),* )?) => {
        Err($crate::error::ShelfError::new(
            file!(),
            line!(),
            column!(),
            $crate::error::ShelfErr::$ty $( (format!($l, $( $args, )*)) )?,
        ))
    };
}

/// Propagate any error convertible to [ShelfErr], capturing the location.
#[macro_export]
macro_rules! map_err {
    ($ex:expr) => {
        $ex.map_err(|e| $crate::error::ShelfError::new(file!(), line!(), column!(), e.into()))?
    };
}
