pub mod app;
pub mod checkin;
pub mod clock;
pub mod config;
pub mod context;
pub mod controllers;
pub mod error;
pub mod middlewares;
pub mod models;
pub mod qr;

pub use self::{
    app::App,
    clock::{Clock, ManualClock, SystemClock},
    error::{Error, Result},
    qr::{TokenService, VerifyError},
};
