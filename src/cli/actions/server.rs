use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::signaro;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            jwt_secret,
            translate_url,
        } => {
            // Fail at startup on an unusable translation URL instead of per request
            if let Some(url) = &translate_url {
                Url::parse(url).with_context(|| format!("Invalid translation URL: {url}"))?;
            }

            let globals = GlobalArgs::new(jwt_secret, translate_url);

            signaro::new(port, dsn, &globals).await?;
        }
    }

    Ok(())
}
