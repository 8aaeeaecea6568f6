//! Tests for the groups module

#[cfg(test)]
mod tests {
    use super::super::models::{
        AddMemberRequest, CreateGroupRequest, UpdateGroupRequest, ROLE_ADMIN, ROLE_MEMBER,
    };
    use crate::common::Validator;

    #[test]
    fn test_create_group_validation_success() {
        let request = CreateGroupRequest {
            name: "Roommates".to_string(),
            description: Some("Apartment expenses".to_string()),
        };

        let result = request.validate(&request);
        assert!(result.is_valid);
    }

    #[test]
    fn test_create_group_validation_requires_name() {
        let request = CreateGroupRequest {
            name: "".to_string(),
            description: None,
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn test_update_group_allows_empty_payload() {
        let request = UpdateGroupRequest {
            name: None,
            description: None,
        };

        let result = request.validate(&request);
        assert!(result.is_valid);
    }

    #[test]
    fn test_add_member_validation_rejects_unknown_role() {
        let request = AddMemberRequest {
            user_id: "U_ABC123".to_string(),
            role: Some("owner".to_string()),
        };

        let result = request.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "role"));
    }

    #[test]
    fn test_add_member_validation_accepts_known_roles() {
        for role in [ROLE_ADMIN, ROLE_MEMBER] {
            let request = AddMemberRequest {
                user_id: "U_ABC123".to_string(),
                role: Some(role.to_string()),
            };

            let result = request.validate(&request);
            assert!(result.is_valid, "role '{}' should be accepted", role);
        }
    }

    #[test]
    fn test_add_member_schema_enumerates_roles() {
        let schema = AddMemberRequest::schema();
        let roles: Vec<&str> = schema["properties"]["role"]["enum"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(roles, [ROLE_ADMIN, ROLE_MEMBER]);
    }
}
