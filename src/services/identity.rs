//! Identity collaborator: current user and administrator check.

use crate::config::IdentityConfig;

#[derive(Debug, Clone)]
pub struct Identity {
    current_user: String,
    admins: Vec<String>,
}

impl Identity {
    pub fn new(current_user: impl Into<String>, admins: Vec<String>) -> Self {
        Self {
            current_user: current_user.into(),
            admins: admins.into_iter().map(|a| a.trim().to_lowercase()).collect(),
        }
    }

    /// Build from configuration, falling back to `$USER` for the current user
    pub fn from_config(config: &IdentityConfig) -> Self {
        let current_user = if config.current_user.trim().is_empty() {
            std::env::var("USER").unwrap_or_else(|_| "anonymous".to_string())
        } else {
            config.current_user.trim().to_string()
        };
        Self::new(current_user, config.admins.clone())
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    pub fn is_admin(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admins.iter().any(|a| *a == email)
    }

    pub fn current_is_admin(&self) -> bool {
        self.is_admin(&self.current_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin_case_insensitive() {
        let identity = Identity::new("Jefe@Uni.cl", vec![" jefe@uni.cl".to_string()]);
        assert!(identity.is_admin("JEFE@uni.cl"));
        assert!(identity.current_is_admin());
        assert!(!identity.is_admin("ana@uni.cl"));
    }

    #[test]
    fn test_from_config_uses_configured_user() {
        let config = IdentityConfig {
            current_user: "ana@uni.cl".to_string(),
            admins: vec![],
        };
        let identity = Identity::from_config(&config);
        assert_eq!(identity.current_user(), "ana@uni.cl");
        assert!(!identity.current_is_admin());
    }
}
