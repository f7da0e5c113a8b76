use crate::{
    Result,
    clock::{Clock, SystemClock},
    config::{Config, QrConfig},
    error::Error,
    models::PgBookingStore,
    qr::{TokenService, WeakSecret},
};

#[derive(Clone, Debug)]
pub struct AppContext {
    pub qr: TokenService<SystemClock>,
    pub bookings: PgBookingStore,
}

impl AppContext {
    pub fn new(qr: TokenService<SystemClock>, bookings: PgBookingStore) -> Self {
        Self { qr, bookings }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let qr = TokenService::try_from(config.qr()).map_err(Error::from)?;
        let bookings = PgBookingStore::new(config.database().pool());

        Ok(Self::new(qr, bookings))
    }
}

impl<C: Clock + Default> TryFrom<&QrConfig> for TokenService<C> {
    type Error = WeakSecret;

    fn try_from(config: &QrConfig) -> Result<Self, Self::Error> {
        Ok(TokenService::new(config.secret(), C::default())?.with_default_ttl(config.ttl()))
    }
}
