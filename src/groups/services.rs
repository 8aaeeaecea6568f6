use super::models::{
    AddMemberRequest, CreateGroupRequest, Group, GroupMember, GroupMemberDetail,
    UpdateGroupRequest, ROLE_ADMIN, ROLE_MEMBER,
};
use crate::common::{generate_group_id, generate_member_id, ApiError, Validator};
use sqlx::SqlitePool;
use tracing::info;

pub struct GroupsService {
    db: SqlitePool,
}

impl GroupsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Group CRUD Operations
    // ========================================================================

    /// Get all groups
    pub async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM groups
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(groups)
    }

    /// Get group by ID
    pub async fn get_group(&self, group_id: &str) -> Result<Group, ApiError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM groups
            WHERE id = ?
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound(format!("Group {} does not exist", group_id)))?;

        Ok(group)
    }

    /// Create a group and add its creator as an admin member in one
    /// transaction
    pub async fn create_group(
        &self,
        created_by: &str,
        request: CreateGroupRequest,
    ) -> Result<Group, ApiError> {
        let validation_result = request.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let group_id = generate_group_id();
        let now = chrono::Utc::now().to_rfc3339();

        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        sqlx::query(
            r#"
            INSERT INTO groups (id, name, description, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&group_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(created_by)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        sqlx::query(
            r#"
            INSERT INTO group_members (id, group_id, user_id, role, joined_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(generate_member_id())
        .bind(&group_id)
        .bind(created_by)
        .bind(ROLE_ADMIN)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!("Created group: {} ({})", request.name, group_id);

        self.get_group(&group_id).await
    }

    /// Update group details
    pub async fn update_group(
        &self,
        group_id: &str,
        request: UpdateGroupRequest,
    ) -> Result<Group, ApiError> {
        let validation_result = request.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let group = self.get_group(group_id).await?;

        let mut updates = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(name) = &request.name {
            updates.push("name = ?");
            params.push(name.clone());
        }
        if let Some(description) = &request.description {
            updates.push("description = ?");
            params.push(description.clone());
        }

        if updates.is_empty() {
            return Ok(group);
        }

        updates.push("updated_at = ?");
        params.push(chrono::Utc::now().to_rfc3339());
        params.push(group_id.to_string());

        let query = format!("UPDATE groups SET {} WHERE id = ?", updates.join(", "));

        let mut query_builder = sqlx::query(&query);
        for param in params {
            query_builder = query_builder.bind(param);
        }

        query_builder
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!("Updated group: {}", group_id);

        self.get_group(group_id).await
    }

    /// Delete a group. Foreign keys cascade to memberships, expenses and
    /// their participant rows.
    pub async fn delete_group(&self, group_id: &str) -> Result<(), ApiError> {
        self.get_group(group_id).await?;

        sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(group_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!("Deleted group: {}", group_id);

        Ok(())
    }

    /// IDs of the group's expenses, for the detail representation
    pub async fn expense_ids(&self, group_id: &str) -> Result<Vec<String>, ApiError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM expenses WHERE group_id = ? ORDER BY created_at ASC")
                .bind(group_id)
                .fetch_all(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    // ========================================================================
    // Membership Management
    // ========================================================================

    /// Get all members of a group, with display names
    pub async fn list_members(&self, group_id: &str) -> Result<Vec<GroupMemberDetail>, ApiError> {
        let members = sqlx::query_as::<_, GroupMemberDetail>(
            r#"
            SELECT m.id, m.group_id, m.user_id, u.name AS user_name, m.role, m.joined_at
            FROM group_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.group_id = ?
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(members)
    }

    /// Look up one membership, if present
    pub async fn membership(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<Option<GroupMember>, ApiError> {
        let member = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT id, group_id, user_id, role, joined_at
            FROM group_members
            WHERE group_id = ? AND user_id = ?
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(member)
    }

    /// Reject unless the user is an admin of the group
    pub async fn require_admin(&self, group_id: &str, user_id: &str) -> Result<(), ApiError> {
        match self.membership(group_id, user_id).await? {
            Some(member) if member.role == ROLE_ADMIN => Ok(()),
            _ => Err(ApiError::Forbidden(
                "Only group admins can perform this action".to_string(),
            )),
        }
    }

    /// Reject unless the user is a member of the group
    pub async fn require_member(&self, group_id: &str, user_id: &str) -> Result<(), ApiError> {
        match self.membership(group_id, user_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::Forbidden(
                "Only group members can perform this action".to_string(),
            )),
        }
    }

    /// Add a user to a group
    pub async fn add_member(
        &self,
        group_id: &str,
        request: AddMemberRequest,
    ) -> Result<GroupMemberDetail, ApiError> {
        let validation_result = request.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        self.get_group(group_id).await?;

        let user: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
            .bind(&request.user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;
        if user.is_none() {
            return Err(ApiError::BadRequest(format!(
                "User {} does not exist",
                request.user_id
            )));
        }

        if self.membership(group_id, &request.user_id).await?.is_some() {
            return Err(ApiError::Conflict(format!(
                "User {} is already a member of this group",
                request.user_id
            )));
        }

        let member_id = generate_member_id();
        let role = request.role.as_deref().unwrap_or(ROLE_MEMBER);
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO group_members (id, group_id, user_id, role, joined_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member_id)
        .bind(group_id)
        .bind(&request.user_id)
        .bind(role)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                ApiError::Conflict(format!(
                    "User {} is already a member of this group",
                    request.user_id
                ))
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        info!("Added member {} to group {}", request.user_id, group_id);

        let members = self.list_members(group_id).await?;
        members
            .into_iter()
            .find(|m| m.id == member_id)
            .ok_or_else(|| ApiError::InternalServer("membership vanished after insert".to_string()))
    }

    /// Remove a user from a group. The last admin cannot leave.
    pub async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.get_group(group_id).await?;

        let member = self
            .membership(group_id, user_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "User {} is not a member of group {}",
                    user_id, group_id
                ))
            })?;

        if member.role == ROLE_ADMIN {
            let (admin_count,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM group_members WHERE group_id = ? AND role = ?",
            )
            .bind(group_id)
            .bind(ROLE_ADMIN)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            if admin_count <= 1 {
                return Err(ApiError::BadRequest(
                    "Cannot remove the last admin of the group".to_string(),
                ));
            }
        }

        sqlx::query("DELETE FROM group_members WHERE id = ?")
            .bind(&member.id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!("Removed member {} from group {}", user_id, group_id);

        Ok(())
    }
}
