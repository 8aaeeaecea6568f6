use super::models::{AddMemberRequest, CreateGroupRequest, UpdateGroupRequest, ROLE_ADMIN, ROLE_MEMBER};
use crate::common::{ValidationResult, Validator};

impl Validator<CreateGroupRequest> for CreateGroupRequest {
    fn validate(&self, data: &CreateGroupRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Group name is required");
        }
        if data.name.len() > 255 {
            result.add_error("name", "Group name must not exceed 255 characters");
        }

        result
    }
}

impl Validator<UpdateGroupRequest> for UpdateGroupRequest {
    fn validate(&self, data: &UpdateGroupRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = &data.name {
            if name.trim().is_empty() {
                result.add_error("name", "Group name cannot be empty");
            }
        }

        result
    }
}

impl Validator<AddMemberRequest> for AddMemberRequest {
    fn validate(&self, data: &AddMemberRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.user_id.trim().is_empty() {
            result.add_error("user_id", "User id is required");
        }
        if let Some(role) = &data.role {
            if role != ROLE_ADMIN && role != ROLE_MEMBER {
                result.add_error("role", "Role must be 'admin' or 'member'");
            }
        }

        result
    }
}
