use serde_json::json;

use crate::actor_framework::{Mutation, Resource};
use crate::api::{endpoints, ApiRequest};
use crate::domain::{is_blank, AssignmentStatus, VendorAssignmentRequest};
use crate::filters::FilterField;
use crate::resources::require_reason;

#[derive(Debug, Clone, Copy, Default)]
pub struct VendorAssignments;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentPageStats {
    pub total: usize,
    pub pending: usize,
    pub assigned: usize,
    pub rejected: usize,
    pub completed: usize,
    pub urgent_pending: usize,
}

#[derive(Debug, Clone)]
pub enum AssignmentAction {
    Assign { request_id: String, vendor_id: String, notes: Option<String> },
    Reject { request_id: String, reason: String },
}

impl Resource for VendorAssignments {
    type Item = VendorAssignmentRequest;
    type Detail = VendorAssignmentRequest;
    type Stats = AssignmentPageStats;
    type Action = AssignmentAction;

    const NAME: &'static str = "vendor assignment requests";
    const EMPTY_MESSAGE: &'static str = "No vendor assignment requests found";
    const LIST_PATH: &'static str = endpoints::VENDOR_ASSIGNMENTS;
    const LIST_KEY: &'static str = "requests";
    const DETAIL_KEY: Option<&'static str> = Some("request");
    const STATS_PATH: Option<&'static str> = Some(endpoints::VENDOR_ASSIGNMENT_STATS);

    fn filter_schema() -> &'static [FilterField] {
        const SCHEMA: &[FilterField] = &[
            FilterField::one_of("status", &["pending", "assigned", "rejected", "completed"]),
            FilterField::one_of("requestType", &["initial", "switch"]),
            FilterField::one_of("priority", &["low", "medium", "high", "urgent"]),
            FilterField::text("search"),
        ];
        SCHEMA
    }

    fn detail_path(id: &str) -> String {
        endpoints::vendor_assignment(id)
    }

    fn page_stats(items: &[VendorAssignmentRequest]) -> AssignmentPageStats {
        items.iter().fold(AssignmentPageStats { total: items.len(), ..Default::default() }, |mut acc, r| {
            match r.status {
                AssignmentStatus::Pending => {
                    acc.pending += 1;
                    if r.priority.is_pressing() {
                        acc.urgent_pending += 1;
                    }
                }
                AssignmentStatus::Assigned => acc.assigned += 1,
                AssignmentStatus::Rejected => acc.rejected += 1,
                AssignmentStatus::Completed => acc.completed += 1,
                AssignmentStatus::Unknown => {}
            }
            acc
        })
    }

    fn mutation(action: &AssignmentAction) -> Result<Mutation, String> {
        match action {
            AssignmentAction::Assign { request_id, vendor_id, notes } => {
                if is_blank(vendor_id) {
                    return Err("Please select a vendor".to_string());
                }
                Ok(Mutation::new(
                    ApiRequest::post(
                        endpoints::vendor_assignment_assign(request_id),
                        json!({ "vendorId": vendor_id, "notes": notes }),
                    ),
                    "Vendor assigned",
                    "Failed to assign vendor",
                ))
            }
            AssignmentAction::Reject { request_id, reason } => {
                let reason = require_reason(reason, "rejecting this request")?;
                Ok(Mutation::new(
                    ApiRequest::post(endpoints::vendor_assignment_reject(request_id), json!({ "reason": reason })),
                    "Request rejected",
                    "Failed to reject request",
                ))
            }
        }
    }
}
