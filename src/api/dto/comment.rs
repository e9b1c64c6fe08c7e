use serde::Deserialize;

use super::{Fields, Validate};

const TEXT_LENGTH: (usize, usize) = (5, 1024);
const RATING: (i64, i64) = (1, 5);

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentDto {
    pub text: String,
    pub rating: i64,
}

impl Validate for CreateCommentDto {
    fn validate(fields: &mut Fields<'_>) {
        if let Some(text) = fields.required::<String>("text") {
            fields.length("text", &text, TEXT_LENGTH);
        }
        if let Some(rating) = fields.required::<i64>("rating") {
            fields.range("rating", rating, RATING);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::rejected;
    use serde_json::json;

    #[test]
    fn fractional_rating_is_a_type_error_on_rating() {
        let fields = rejected::<CreateCommentDto>(json!({"text": "Lovely flat", "rating": 4.5}));
        assert_eq!(fields, vec!["rating"]);
    }
}
