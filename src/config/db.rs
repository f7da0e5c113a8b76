use serde::{Deserialize, Serialize};
use sqlx::{
    ConnectOptions, PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use tracing::log::LevelFilter;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    username: String,
    host: String,
    password: String,
    database: String,
    port: u16,
    ssl: bool,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseConfig {
    pub fn pool(&self) -> PgPool {
        let ssl_mode = if self.ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(&self.password)
            .port(self.port)
            .ssl_mode(ssl_mode)
            .database(&self.database);

        options = options.log_statements(LevelFilter::Debug);

        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_lazy_with(options)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn connection_fields_are_enough() {
        let config: DatabaseConfig = serde_json::from_value(json!({
            "username": "postgres",
            "host": "localhost",
            "password": "postgres",
            "database": "checkin",
            "port": 5432,
            "ssl": false
        }))
        .unwrap();

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.database, "checkin");
    }
}
