use std::sync::mpsc::RecvTimeoutError;

use thiserror::Error;

pub mod app;
pub mod config;
pub mod core;
pub mod ctrl;
pub mod procfs;
pub mod triggers;
pub mod ui;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    CoreError(#[from] core::Error),
    #[error(transparent)]
    UiError(#[from] ui::Error),
    #[error("Trigger channel disconnected")]
    MpscError(#[source] RecvTimeoutError),
}
