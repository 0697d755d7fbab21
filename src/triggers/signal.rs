use std::sync::mpsc::Sender;

use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM, SIGWINCH};
use signal_hook::iterator::Signals;

use crate::triggers::{Error, Trigger};

/// Listens for UNIX signals and emits appropriate triggers
pub struct SignalListener {
    sender: Sender<Trigger>,
    exit: bool,
}

impl SignalListener {
    pub fn new(sender: Sender<Trigger>) -> Self {
        Self { sender, exit: false }
    }

    pub fn listen(mut self) -> Result<(), Error> {
        let mut signals = Signals::new([SIGINT, SIGTERM, SIGQUIT, SIGWINCH]).map_err(Error::SignalError)?;

        for signal in signals.forever() {
            match signal {
                SIGWINCH => self.send(Trigger::Resize),
                _ => self.send_exit(),
            }

            if self.exit {
                break;
            }
        }

        Ok(())
    }

    fn send_exit(&mut self) {
        self.send(Trigger::Exit);
        self.exit = true;
    }

    fn send(&mut self, trigger: Trigger) {
        if self.sender.send(trigger).is_err() {
            self.exit = true;
        }
    }
}
