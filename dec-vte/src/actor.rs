//! Callback interface invoked by the recognizer.
//!
//! The [`Parser`](crate::Parser) walks a byte stream and reduces it to a
//! sequence of grammar-level events: printable characters, immediate C0/C1
//! controls, dispatched ESC/CSI sequences, and the open/body/close phases of
//! DCS, OSC and SOS/PM/APC strings. Interpreting those events (cursor
//! motion, colors, mode state) is entirely the [`Actor`]'s business; the
//! parser only recognizes the grammar.

use crate::enums::{Action, State};
use crate::params::Params;

/// Read-only view of the parser handed to every [`Actor`] callback.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// State the parser was in when the event fired.
    pub state: State,
    /// Intermediate bytes collected so far (e.g. `(`, `?`, `$`, ` `).
    pub intermediates: &'a [u8],
    /// Parameters accumulated so far.
    pub params: &'a Params,
    /// Raw bytes consumed since the previous dispatch. Concatenating these
    /// spans across all dispatches reconstructs the input byte-for-byte.
    pub raw: &'a [u8],
}

/// Consumer-facing interface for parser events.
///
/// `action` is `None` exactly twice per stream: once if the parser is
/// explicitly reset and once at end of stream. Both mean "flush any open
/// context, no new data". `ch` carries the triggering character for actions
/// that have one (`Print`, `Execute`, `Put`, `OscPut` and the dispatches)
/// and is `None` for sentinel calls and for entry/exit actions such as
/// `Hook`, `Unhook`, `OscStart` and `OscEnd`.
///
/// Calls arrive synchronously, in input order, on the thread driving
/// [`Parser::parse`](crate::Parser::parse). An implementation must not
/// re-enter the same parser instance from inside a callback.
pub trait Actor {
    fn event(&mut self, ctx: Context<'_>, action: Option<Action>, ch: Option<char>);
}
