use strum::{AsRefStr, Display};

/// Stored in `users.role` as its name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, AsRefStr)]
pub enum Role {
    Admin,
    User,
    Compliance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_form_is_the_variant_name() {
        assert_eq!(Role::Admin.as_ref(), "Admin");
        assert_eq!(Role::Compliance.to_string(), "Compliance");
    }
}
