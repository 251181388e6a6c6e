//! Value Object Module

pub mod card_ref;
pub mod email;
pub mod full_name;
pub mod member_password;
pub mod university_id;
