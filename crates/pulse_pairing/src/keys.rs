//! Store keys owned by identity and pairing.

pub const USER_PREFIX: &str = "user:";

pub fn user(user_id: &str) -> String {
    format!("user:{user_id}")
}

pub fn code(code: &str) -> String {
    format!("code:{code}")
}

/// Points at the issuer's most recently generated code.
pub fn code_for_user(user_id: &str) -> String {
    format!("code:user:{user_id}")
}

pub fn couple(couple_id: &str) -> String {
    format!("couple:{couple_id}")
}

pub fn couple_for_user(user_id: &str) -> String {
    format!("couple:user:{user_id}")
}
