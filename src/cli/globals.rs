use secrecy::SecretString;

#[derive(Clone)]
pub struct GlobalArgs {
    pub jwt_secret: SecretString,
    pub translate_url: Option<String>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(jwt_secret: SecretString, translate_url: Option<String>) -> Self {
        Self {
            jwt_secret,
            translate_url,
        }
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("jwt_secret", &"***")
            .field("translate_url", &self.translate_url)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(SecretString::from("hunter2".to_string()), None);
        assert_eq!(args.jwt_secret.expose_secret(), "hunter2");
        assert!(args.translate_url.is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let args = GlobalArgs::new(
            SecretString::from("hunter2".to_string()),
            Some("https://translate.local".to_string()),
        );
        let debug = format!("{args:?}");
        assert!(debug.contains("***"));
        assert!(!debug.contains("hunter2"));
    }
}
