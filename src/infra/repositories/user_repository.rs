//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{csv, CreateUser, User, UserType};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Soft-deleted accounts are invisible to every query.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Insert a user. A unique-email violation surfaces as `DuplicateEmail`.
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// Set `last_login_at` to now
    async fn touch_last_login(&self, id: i64) -> AppResult<()>;

    /// Users of one type, in id order
    async fn find_by_user_type(&self, user_type: UserType) -> AppResult<Vec<User>>;

    /// Fails with `NotFound` when no row matched
    async fn update_profile_url(&self, id: i64, url: String) -> AppResult<()>;

    /// Fails with `NotFound` when no row matched
    async fn update_fcm_token(&self, id: i64, token: String) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn update_column(&self, id: i64, column: user::Column, value: String) -> AppResult<()> {
        let result = UserEntity::update_many()
            .col_expr(column, Expr::value(value))
            .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("user"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, input: CreateUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let partner = input.partner;
        let active_model = ActiveModel {
            username: Set(input.username),
            nickname: Set(input.nickname),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            gender: Set(input.gender.to_string()),
            birthdate: Set(input.birthdate),
            address: Set(input.address),
            user_type: Set(input.user_type.to_string()),
            status: Set(input.status.to_string()),
            tin: Set(partner.tin),
            ca_categorical: Set(partner.ca_categorical.map(|v| v.to_string())),
            vet_specialty: Set(partner.vet_specialty.map(|v| v.to_string())),
            petsitter_work: Set(partner.petsitter_work.map(|v| v.to_string())),
            working_days: Set(csv::encode(&partner.working_days)),
            working_start_hours: Set(partner.working_start_hours),
            working_end_hours: Set(partner.working_end_hours),
            locked_until: Set(None),
            last_login_at: Set(None),
            profile_url: Set(None),
            fcm_token: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_insert(e, "user"))?;
        User::try_from(model)
    }

    async fn touch_last_login(&self, id: i64) -> AppResult<()> {
        UserEntity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(chrono::Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn find_by_user_type(&self, user_type: UserType) -> AppResult<Vec<User>> {
        UserEntity::find()
            .filter(user::Column::UserType.eq(user_type.to_string()))
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn update_profile_url(&self, id: i64, url: String) -> AppResult<()> {
        self.update_column(id, user::Column::ProfileUrl, url).await
    }

    async fn update_fcm_token(&self, id: i64, token: String) -> AppResult<()> {
        self.update_column(id, user::Column::FcmToken, token).await
    }
}
