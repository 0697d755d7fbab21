//! Emits the events which drive the application, from user inputs and UNIX signals

use std::sync::mpsc::Sender;
use std::thread;

use log::error;
use thiserror::Error;

use crate::triggers::input::InputListener;
use crate::triggers::signal::SignalListener;

mod input;
mod signal;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error reading user input")]
    InputError(#[source] std::io::Error),
    #[error("Error registering signal handlers")]
    SignalError(#[source] std::io::Error),
}

/// Keys with an effect on the application
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Key {
    Left,
    Right,
    N,
    P,
    Plus,
    Minus,
    B,
    R,
    Other,
}

#[derive(Debug, Eq, PartialEq)]
pub enum Trigger {
    Exit,
    Input(Key),
    Resize,
}

pub struct TriggersEmitter;

impl TriggersEmitter {
    /// Starts the threads listening for user inputs and signals
    pub fn launch_async(sender: Sender<Trigger>) {
        let input_sender = sender.clone();
        let signal_sender = sender;

        Self::start_input_thread(input_sender);
        Self::start_signal_thread(signal_sender);
    }

    fn start_input_thread(sender: Sender<Trigger>) {
        thread::spawn(move || {
            if let Err(e) = InputListener::new(sender).listen() {
                error!("Trigger error: {:?}", e);
            }
        });
    }

    fn start_signal_thread(sender: Sender<Trigger>) {
        thread::spawn(move || {
            if let Err(e) = SignalListener::new(sender).listen() {
                error!("Trigger error: {:?}", e);
            }
        });
    }
}
