mod claims;
mod language;
mod page;
mod questionnaire;

pub use claims::{Claims, ClaimsError, decode_claims};
pub use language::{LanguageCode, LanguageCodeError, TranslationTable, Translations};
pub use page::{HistoryEntry, PageLink, PageName, PageNameError};
pub use questionnaire::{
    CHOICE_COUNT, NewQuestion, Question, QuestionGroup, QuestionUpdate, Questionnaire,
    UserProfile,
};
