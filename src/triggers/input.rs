use std::io::stdin;
use std::sync::mpsc::Sender;

use termion::event::Key as TermionKey;
use termion::input::TermRead;

use crate::triggers::{Error, Key, Trigger};

pub struct InputListener {
    sender: Sender<Trigger>,
    exit: bool,
}

impl InputListener {
    pub fn new(sender: Sender<Trigger>) -> Self {
        Self { sender, exit: false }
    }

    pub fn listen(mut self) -> Result<(), Error> {
        for key_ret in stdin().keys() {
            let key = key_ret.map_err(Error::InputError)?;

            match key {
                TermionKey::Ctrl('c') | TermionKey::Ctrl('d') | TermionKey::Char('q') => self.send_exit(),
                key => self.send(Trigger::Input(translate_key(key))),
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

fn translate_key(key: TermionKey) -> Key {
    match key {
        TermionKey::Left => Key::Left,
        TermionKey::Right => Key::Right,
        TermionKey::Char('n') => Key::N,
        TermionKey::Char('p') => Key::P,
        TermionKey::Char('+') => Key::Plus,
        TermionKey::Char('-') => Key::Minus,
        TermionKey::Char('b') => Key::B,
        TermionKey::Char('r') => Key::R,
        _ => Key::Other,
    }
}
