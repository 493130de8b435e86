use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewForm {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_validated() {
        let form = |rating| ReviewForm {
            rating,
            comment: String::new(),
        };
        assert!(form(1).validate().is_ok());
        assert!(form(5).validate().is_ok());
        assert!(form(0).validate().is_err());
        assert!(form(6).validate().is_err());
    }
}
