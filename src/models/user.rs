use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{
    NewUser as DomainNewUser, UpdateProfile as DomainUpdateProfile, User as DomainUser,
};

/// Diesel model for [`crate::domain::user::User`].
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub language: String,
    pub telegram_chat_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`User`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: Option<&'a str>,
    pub language: &'a str,
}

/// Data used when updating a profile; `None` fields are left untouched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser<'a> {
    pub name: Option<&'a str>,
    pub language: Option<&'a str>,
    pub telegram_chat_id: Option<i64>,
    pub updated_at: NaiveDateTime,
}

impl From<User> for DomainUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            language: user.language,
            telegram_chat_id: user.telegram_chat_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
            name: user.name.as_deref(),
            language: user.language.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateProfile> for UpdateUser<'a> {
    fn from(update: &'a DomainUpdateProfile) -> Self {
        Self {
            name: update.name.as_deref(),
            language: update.language.as_deref(),
            telegram_chat_id: update.telegram_chat_id,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn from_domain_new_creates_newuser() {
        let domain = DomainNewUser::new(
            "User@Example.COM ".to_string(),
            "$argon2id$hash".to_string(),
            Some(" Anna ".to_string()),
        );
        let new: NewUser = (&domain).into();
        assert_eq!(new.email, "user@example.com");
        assert_eq!(new.password_hash, "$argon2id$hash");
        assert_eq!(new.name, Some("Anna"));
        assert_eq!(new.language, "de");
    }

    #[test]
    fn user_into_domain() {
        let now: NaiveDateTime = Utc::now().naive_utc();
        let db_user = User {
            id: 7,
            email: "a@b.de".to_string(),
            password_hash: "h".to_string(),
            name: None,
            language: "de".to_string(),
            telegram_chat_id: Some(42),
            created_at: now,
            updated_at: now,
        };
        let domain: DomainUser = db_user.into();
        assert_eq!(domain.id, 7);
        assert_eq!(domain.email, "a@b.de");
        assert_eq!(domain.telegram_chat_id, Some(42));
        assert_eq!(domain.created_at, now);
    }

    #[test]
    fn from_domain_update_skips_empty_fields() {
        let domain = DomainUpdateProfile::new(Some("  ".to_string()), None, Some(99));
        let update: UpdateUser = (&domain).into();
        assert_eq!(update.name, None);
        assert_eq!(update.language, None);
        assert_eq!(update.telegram_chat_id, Some(99));
    }
}
