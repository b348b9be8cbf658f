use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PresignDocumentRequest {
    #[validate(length(min = 1, max = 255))]
    pub(crate) filename: String,
    #[validate(length(min = 1, max = 255))]
    pub(crate) filetype: String,
}
