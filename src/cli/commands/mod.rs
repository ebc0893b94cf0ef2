use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("signaro")
        .about("Sign vocabulary and authentication backend")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("3001")
                .env("SIGNARO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("dsn")
                .short('d')
                .long("dsn")
                .help("Database connection string, example: sqlite:signaro.db")
                .default_value("sqlite:signaro.db")
                .env("SIGNARO_DSN"),
        )
        .arg(
            Arg::new("jwt-secret")
                .long("jwt-secret")
                .help("Secret used to sign and verify session tokens")
                .env("SIGNARO_JWT_SECRET")
                .required(true),
        )
        .arg(
            Arg::new("translate-url")
                .long("translate-url")
                .help("Remote translation service URL, omit to disable /api/translate")
                .env("SIGNARO_TRANSLATE_URL"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("SIGNARO_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "signaro");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Sign vocabulary and authentication backend"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_check_port_and_dsn() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "signaro",
            "--port",
            "3001",
            "--dsn",
            "sqlite:signaro.db",
            "--jwt-secret",
            "test-secret",
        ]);

        assert_eq!(matches.get_one::<u16>("port").map(|s| *s), Some(3001));
        assert_eq!(
            matches.get_one::<String>("dsn").map(|s| s.to_string()),
            Some("sqlite:signaro.db".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("jwt-secret")
                .map(|s| s.to_string()),
            Some("test-secret".to_string())
        );
        assert_eq!(matches.get_one::<String>("translate-url"), None);
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("SIGNARO_PORT", Some("8081")),
                ("SIGNARO_DSN", Some("sqlite::memory:")),
                ("SIGNARO_JWT_SECRET", Some("env-secret")),
                ("SIGNARO_TRANSLATE_URL", Some("https://translate.local")),
                ("SIGNARO_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["signaro"]);
                assert_eq!(matches.get_one::<u16>("port").map(|s| *s), Some(8081));
                assert_eq!(
                    matches.get_one::<String>("dsn").map(|s| s.to_string()),
                    Some("sqlite::memory:".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>("jwt-secret")
                        .map(|s| s.to_string()),
                    Some("env-secret".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>("translate-url")
                        .map(|s| s.to_string()),
                    Some("https://translate.local".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").map(|s| *s), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("SIGNARO_LOG_LEVEL", Some(level)),
                    ("SIGNARO_JWT_SECRET", Some("secret")),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["signaro"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").map(|s| *s),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("SIGNARO_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "signaro".to_string(),
                    "--jwt-secret".to_string(),
                    "secret".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        temp_env::with_vars([("SIGNARO_JWT_SECRET", None::<String>)], || {
            let command = new();
            let result = command.try_get_matches_from(vec!["signaro"]);
            assert!(result.is_err());
        });
    }
}
