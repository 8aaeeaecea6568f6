//! URL construction helpers for hypermedia controls

pub fn users() -> String {
    "/api/users".to_string()
}

pub fn user(user_id: &str) -> String {
    format!("/api/users/{}", user_id)
}

pub fn groups() -> String {
    "/api/groups".to_string()
}

pub fn group(group_id: &str) -> String {
    format!("/api/groups/{}", group_id)
}

pub fn group_members(group_id: &str) -> String {
    format!("/api/groups/{}/members", group_id)
}

pub fn group_member(group_id: &str, user_id: &str) -> String {
    format!("/api/groups/{}/members/{}", group_id, user_id)
}

pub fn group_expenses(group_id: &str) -> String {
    format!("/api/groups/{}/expenses", group_id)
}

pub fn group_balances(group_id: &str) -> String {
    format!("/api/groups/{}/balances", group_id)
}

pub fn expense(expense_id: &str) -> String {
    format!("/api/expenses/{}", expense_id)
}

pub fn expense_participants(expense_id: &str) -> String {
    format!("/api/expenses/{}/participants", expense_id)
}
