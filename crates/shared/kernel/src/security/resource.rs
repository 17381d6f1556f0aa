use std::borrow::Cow;

#[atelier_derive::atelier_error]
pub enum ResourceGuardError {
    /// The id named another table, or had no key part.
    #[error("Record id rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Validates typed record ids before they reach a query.
///
/// Repositories bind ids into `type::thing(...)`, which already rules out
/// injection; the guard closes the remaining hole where a syntactically
/// valid id points at a different table (a `user:...` id handed to a lead
/// endpoint).
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Checks `id` against `expected_table` and returns the full
    /// `table:key` form. Bare keys are accepted and prefixed.
    ///
    /// # Errors
    /// [`ResourceGuardError::Rejected`] when the id names another table or
    /// its key part is empty.
    pub fn verify<I, T>(id: I, expected_table: T) -> Result<String, ResourceGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let table = expected_table.as_ref();
        Self::key(&id, table).map(|key| format!("{table}:{key}"))
    }

    /// Same check as [`ResourceGuard::verify`], returning only the key part
    /// for `type::thing` binds.
    ///
    /// # Errors
    /// [`ResourceGuardError::Rejected`] when the id names another table or
    /// its key part is empty.
    pub fn key<I, T>(id: I, expected_table: T) -> Result<String, ResourceGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let expected = expected_table.as_ref();

        let (table, key) = match id.as_ref().split_once(':') {
            Some(parts) => parts,
            None => (expected, id.as_ref()),
        };

        if table != expected {
            return Err(ResourceGuardError::Rejected {
                message: format!("expected a '{expected}' id, got '{table}'").into(),
                context: Some("Record id names another table".into()),
            });
        }

        if key.is_empty() {
            return Err(ResourceGuardError::Rejected {
                message: format!("'{table}:' has no key part").into(),
                context: None,
            });
        }

        Ok(key.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_ids_pass_through() {
        assert_eq!(ResourceGuard::verify("lead:123", "lead").unwrap(), "lead:123");
        assert_eq!(ResourceGuard::key("lead:123", "lead").unwrap(), "123");
    }

    #[test]
    fn bare_keys_are_prefixed() {
        assert_eq!(ResourceGuard::verify("123", "lead").unwrap(), "lead:123");
        assert_eq!(ResourceGuard::key("123", "lead").unwrap(), "123");
    }

    #[test]
    fn foreign_tables_are_rejected() {
        assert!(ResourceGuard::verify("system:config", "lead").is_err());
        assert!(ResourceGuard::key("user:abc", "lead").is_err());
    }

    #[test]
    fn empty_keys_are_rejected() {
        assert!(ResourceGuard::verify("lead:", "lead").is_err());
    }
}
