use serde_json::json;

use crate::actor_framework::{Mutation, Resource};
use crate::api::{endpoints, ApiRequest};
use crate::domain::{Review, ReviewStatus};
use crate::filters::FilterField;

#[derive(Debug, Clone, Copy, Default)]
pub struct Reviews;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPageStats {
    pub total: usize,
    pub hidden: usize,
    pub average_rating: Option<f64>,
    /// Reviews rated 1 to 5, index 0 being one star.
    pub distribution: [usize; 5],
}

#[derive(Debug, Clone)]
pub enum ReviewAction {
    Hide { id: String },
    Unhide { id: String },
    Delete { id: String },
}

impl Resource for Reviews {
    type Item = Review;
    type Detail = Review;
    type Stats = ReviewPageStats;
    type Action = ReviewAction;

    const NAME: &'static str = "reviews";
    const EMPTY_MESSAGE: &'static str = "No reviews found";
    const LIST_PATH: &'static str = endpoints::REVIEWS;
    const LIST_KEY: &'static str = "reviews";
    const DETAIL_KEY: Option<&'static str> = Some("review");
    const STATS_PATH: Option<&'static str> = Some(endpoints::REVIEW_STATS);

    fn filter_schema() -> &'static [FilterField] {
        const SCHEMA: &[FilterField] = &[
            FilterField::one_of("reviewType", &["subscription", "vendor", "order"]),
            FilterField::number("rating"),
            FilterField::one_of("status", &["active", "hidden"]),
            FilterField::text("search"),
        ];
        SCHEMA
    }

    fn detail_path(id: &str) -> String {
        endpoints::review(id)
    }

    fn page_stats(items: &[Review]) -> ReviewPageStats {
        let mut distribution = [0usize; 5];
        let mut rated = 0usize;
        let mut sum = 0u64;
        for r in items.iter().filter(|r| (1..=5).contains(&r.rating)) {
            distribution[usize::from(r.rating - 1)] += 1;
            rated += 1;
            sum += u64::from(r.rating);
        }
        ReviewPageStats {
            total: items.len(),
            hidden: items.iter().filter(|r| r.status == ReviewStatus::Hidden).count(),
            average_rating: (rated > 0).then(|| sum as f64 / rated as f64),
            distribution,
        }
    }

    fn mutation(action: &ReviewAction) -> Result<Mutation, String> {
        match action {
            ReviewAction::Hide { id } => Ok(Mutation::new(
                ApiRequest::patch(endpoints::review_visibility(id), Some(json!({ "status": ReviewStatus::Hidden }))),
                "Review hidden",
                "Failed to hide review",
            )),
            ReviewAction::Unhide { id } => Ok(Mutation::new(
                ApiRequest::patch(endpoints::review_visibility(id), Some(json!({ "status": ReviewStatus::Active }))),
                "Review is visible again",
                "Failed to show review",
            )),
            ReviewAction::Delete { id } => Ok(Mutation::new(
                ApiRequest::delete(endpoints::review(id)),
                "Review deleted",
                "Failed to delete review",
            )
            .confirm("Are you sure you want to delete this review?")),
        }
    }
}
