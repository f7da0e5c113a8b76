use serde::Deserialize;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::Result;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Logger {
    level: String,
    #[serde(default)]
    format: LogFormat,
    /// Extra filter directives, e.g. `sqlx=warn`.
    #[serde(default)]
    directives: Vec<String>,
}

impl Logger {
    /// `RUST_LOG` wins when set; otherwise the configured level and directives.
    pub fn filter(&self) -> Result<EnvFilter> {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return EnvFilter::try_from_default_env().map_err(Into::into);
        }

        let mut filter = EnvFilter::try_new(&self.level)?;
        for directive in &self.directives {
            filter = filter.add_directive(directive.parse()?);
        }

        Ok(filter)
    }

    pub fn setup(&self) -> Result<()> {
        let filter = self.filter()?;

        let pretty = (self.format == LogFormat::Pretty).then(|| fmt::layer().pretty());
        let compact = (self.format == LogFormat::Compact).then(|| fmt::layer().compact());
        let json = (self.format == LogFormat::Json).then(|| fmt::layer().json());

        tracing_subscriber::registry()
            .with(filter)
            .with(pretty)
            .with(compact)
            .with(json)
            .with(ErrorLayer::default())
            .try_init()?;

        Ok(())
    }
}
