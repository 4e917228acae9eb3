use thiserror::Error;

use crate::model::{ClaimsError, LanguageCodeError, PageNameError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Claims(#[from] ClaimsError),
    #[error(transparent)]
    PageName(#[from] PageNameError),
    #[error(transparent)]
    LanguageCode(#[from] LanguageCodeError),
}
