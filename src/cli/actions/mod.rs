pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        jwt_secret: SecretString,
        translate_url: Option<String>,
    },
}
