use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("Regex Error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Url Error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Couldn't fetch the first page ({url}): {reason}")]
    FirstPage { url: String, reason: String },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Couldn't flush the csv writer: {0}")]
    CsvFlush(String),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl<W> From<csv::IntoInnerError<W>> for Error {
    fn from(value: csv::IntoInnerError<W>) -> Self {
        Error::CsvFlush(value.error().to_string())
    }
}
