use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageForm {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}
