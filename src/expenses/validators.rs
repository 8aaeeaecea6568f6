use super::models::{
    AddParticipantRequest, CreateExpenseRequest, ParticipantPayload, UpdateExpenseRequest,
};
use crate::common::{ValidationResult, Validator};
use std::collections::HashSet;

fn check_amount(result: &mut ValidationResult, field: &str, amount: f64) {
    if !amount.is_finite() {
        result.add_error(field, "Amount must be a finite number");
    } else if amount <= 0.0 {
        result.add_error(field, "Amount must be positive");
    }
}

fn check_participants(result: &mut ValidationResult, participants: &[ParticipantPayload]) {
    if participants.is_empty() {
        result.add_error("participants", "Participant list cannot be empty");
    }

    let mut seen = HashSet::new();
    for participant in participants {
        if participant.user_id.trim().is_empty() {
            result.add_error("participants", "Participant user_id is required");
        }
        if !seen.insert(participant.user_id.as_str()) {
            result.add_error(
                "participants",
                "A user cannot appear twice in one expense",
            );
        }
        if !participant.share.is_finite() || participant.share < 0.0 {
            result.add_error("participants", "Share must be a non-negative number");
        }
        if let Some(paid) = participant.paid {
            if !paid.is_finite() || paid < 0.0 {
                result.add_error("participants", "Paid must be a non-negative number");
            }
        }
    }
}

impl Validator<CreateExpenseRequest> for CreateExpenseRequest {
    fn validate(&self, data: &CreateExpenseRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        check_amount(&mut result, "amount", data.amount);
        if data.description.trim().is_empty() {
            result.add_error("description", "Description is required");
        }

        if data.participants.is_some() && data.split_among.is_some() {
            result.add_error(
                "participants",
                "Provide either explicit participants or split_among, not both",
            );
            return result;
        }

        if let Some(participants) = &data.participants {
            check_participants(&mut result, participants);
        }

        if let Some(split_among) = &data.split_among {
            if split_among.is_empty() {
                result.add_error("split_among", "split_among cannot be empty");
            }
            let unique: HashSet<&str> = split_among.iter().map(String::as_str).collect();
            if unique.len() != split_among.len() {
                result.add_error("split_among", "split_among contains duplicate users");
            }
            if data.paid_by.as_deref().map_or(true, |p| p.trim().is_empty()) {
                result.add_error("paid_by", "paid_by is required with split_among");
            }
        } else if data.paid_by.is_some() {
            result.add_error("paid_by", "paid_by only makes sense with split_among");
        }

        result
    }
}

impl Validator<UpdateExpenseRequest> for UpdateExpenseRequest {
    fn validate(&self, data: &UpdateExpenseRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(amount) = data.amount {
            check_amount(&mut result, "amount", amount);
        }
        if let Some(description) = &data.description {
            if description.trim().is_empty() {
                result.add_error("description", "Description cannot be empty");
            }
        }
        if let Some(participants) = &data.participants {
            check_participants(&mut result, participants);
        }

        result
    }
}

impl Validator<AddParticipantRequest> for AddParticipantRequest {
    fn validate(&self, data: &AddParticipantRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.user_id.trim().is_empty() {
            result.add_error("user_id", "User id is required");
        }
        if !data.share.is_finite() || data.share < 0.0 {
            result.add_error("share", "Share must be a non-negative number");
        }
        if let Some(paid) = data.paid {
            if !paid.is_finite() || paid < 0.0 {
                result.add_error("paid", "Paid must be a non-negative number");
            }
        }

        result
    }
}
