//! The DEC ANSI state machine core.
//!
//! `Parser` owns the current state, the intermediate and parameter
//! accumulators, and drives the main loop: pull one tagged value from the
//! [`reader`](crate::reader), look it up in the dense transition table,
//! fire exit/transition/entry actions in that order, and hand completed
//! events to the caller's [`Actor`]. Malformed sequences are never errors;
//! they fall into the `CsiIgnore`/`DcsIgnore` states and are swallowed until
//! the machine resynchronizes on a dispatch-class byte.

use std::io::{self, Read};

use crate::actor::{Actor, Context};
use crate::enums::{Action, State};
use crate::params::Params;
use crate::reader::{Input, Reader};
use crate::transitions::{self, Transition};

/// Failures that can abort [`Parser::parse`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input source failed with something other than end of stream.
    #[error("failed to read from input source: {0}")]
    Read(#[from] io::Error),
}

#[derive(Default)]
pub struct Parser {
    state: State,
    intermediates: Vec<u8>,
    params: Params,
    /// Suppresses the esc_dispatch produced by the `\` of a two-byte ST.
    esc_ended_string: bool,
    /// Raw bytes consumed since the last dispatch.
    raw: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn intermediates(&self) -> &[u8] {
        &self.intermediates
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Force the machine back to ground. The actor receives one sentinel
    /// event (`action = None`) so it can flush any open context.
    pub fn reset<A: Actor>(&mut self, actor: &mut A) {
        self.state = State::Ground;
        self.esc_ended_string = false;
        actor.event(self.context(), None, None);
        self.raw.clear();
        self.clear();
    }

    /// Recognize `source` to exhaustion, dispatching events to `actor`.
    ///
    /// A device-level `EIO` from the source counts as ordinary end of
    /// stream (a hung-up pty); any other I/O failure aborts with
    /// [`Error::Read`]. Once the stream ends the actor receives one
    /// sentinel event (`action = None`).
    ///
    /// The parser keeps its state across calls, so a stream may be fed in
    /// several pieces.
    pub fn parse<R: Read, A: Actor>(
        &mut self,
        source: R,
        actor: &mut A,
    ) -> Result<(), Error> {
        let mut reader = Reader::new(source);
        while let Some(input) = reader.next(&mut self.raw)? {
            self.advance(input, actor);
        }
        actor.event(self.context(), None, None);
        self.raw.clear();
        Ok(())
    }

    fn advance<A: Actor>(&mut self, input: Input, actor: &mut A) {
        let (code, ch) = match input {
            // Decoded scalars are always printable; classify them like `~`
            // (a GL print-class byte) but dispatch the real character.
            Input::Decoded(c) => (0x7e, c),
            Input::Raw(byte) => (transitions::fold(byte), char::from(byte)),
        };

        let Transition { target, action } =
            transitions::table().lookup(self.state, code);

        let Some(next) = target else {
            if let Some(action) = action {
                self.process(action, Some(ch), actor);
            }
            return;
        };

        if let Some(exit) = transitions::exit_action(self.state) {
            log::trace!("leaving {:?}", self.state);
            self.process(exit, None, actor);
            // ESC here is the first byte of a two-byte ST; the `\` that
            // follows must not surface as an esc_dispatch.
            if ch == '\x1b' {
                self.esc_ended_string = true;
            }
        }
        if let Some(action) = action {
            self.process(action, Some(ch), actor);
        }
        if let Some(entry) = transitions::entry_action(next) {
            log::trace!("entering {next:?}");
            self.process(entry, None, actor);
        }
        self.state = next;
    }

    fn process<A: Actor>(
        &mut self,
        action: Action,
        ch: Option<char>,
        actor: &mut A,
    ) {
        use Action::*;

        match action {
            Ignore => {}
            Clear => self.clear(),
            Collect => match ch {
                Some(c) => self.intermediates.push(c as u8),
                None => panic!("collect action without a character"),
            },
            Param => match ch {
                Some(';') => self.params.separator(),
                Some(':') => self.params.subseparator(),
                Some(c @ '0'..='9') => {
                    self.params.digit(c as u32 - '0' as u32);
                }
                other => panic!("unexpected param character {other:?}"),
            },
            Print | Execute | EscDispatch | CsiDispatch | Hook | Put
            | Unhook | OscStart | OscPut | OscEnd => {
                if self.esc_ended_string {
                    self.esc_ended_string = false;
                    // Second byte of a two-byte ST; the string it closed
                    // has already been dispatched.
                    if action == EscDispatch && ch == Some('\\') {
                        return;
                    }
                }
                log::trace!("dispatching {action:?}");
                actor.event(self.context(), Some(action), ch);
                self.raw.clear();
            }
        }
    }

    fn context(&self) -> Context<'_> {
        Context {
            state: self.state,
            intermediates: &self.intermediates,
            params: &self.params,
            raw: &self.raw,
        }
    }

    fn clear(&mut self) {
        self.intermediates.clear();
        self.params.reset();
    }
}
