//! Member Entity
//!
//! A registered library member. Created exactly once by sign-up after
//! the uniqueness check passes; this core never mutates or deletes it.

use chrono::{DateTime, Utc};
use kernel::id::MemberId;

use crate::domain::value_object::{
    card_ref::CardRef, email::Email, full_name::FullName, member_password::MemberPassword,
    university_id::UniversityId,
};

/// Member entity
#[derive(Debug, Clone)]
pub struct Member {
    /// Internal UUID identifier
    pub member_id: MemberId,
    /// Full name
    pub full_name: FullName,
    /// Email (unique, case-normalized)
    pub email: Email,
    /// Campus-issued identifier (unique)
    pub university_id: UniversityId,
    /// Password digest (never the plaintext)
    pub password_digest: MemberPassword,
    /// Opaque reference to the uploaded university card
    pub university_card_ref: CardRef,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member
    pub fn new(
        full_name: FullName,
        email: Email,
        university_id: UniversityId,
        password_digest: MemberPassword,
        university_card_ref: CardRef,
    ) -> Self {
        let now = Utc::now();

        Self {
            member_id: MemberId::new(),
            full_name,
            email,
            university_id,
            password_digest,
            university_card_ref,
            created_at: now,
            updated_at: now,
        }
    }
}
