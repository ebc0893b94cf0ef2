use crate::cli::actions::Action;
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(3001),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        jwt_secret: matches
            .get_one("jwt-secret")
            .map(|s: &String| SecretString::from(s.to_string()))
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --jwt-secret"))?,
        translate_url: matches
            .get_one("translate-url")
            .map(|s: &String| s.to_string()),
    })
}
