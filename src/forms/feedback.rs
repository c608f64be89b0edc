use serde::Deserialize;

use crate::domain::types::FeedbackId;
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
pub struct FeedbackReviewedForm {
    pub id: i64,
}

impl TryFrom<FeedbackReviewedForm> for FeedbackId {
    type Error = FormError;

    fn try_from(form: FeedbackReviewedForm) -> Result<Self, Self::Error> {
        FeedbackId::new(form.id).map_err(|_| FormError::InvalidId)
    }
}
