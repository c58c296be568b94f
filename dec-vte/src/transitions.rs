//! Transition table for the DEC ANSI finite state machine.
//!
//! The table is specified sparsely as per-state lists of inclusive code point
//! ranges, plus one shared "anywhere" list that is applied on top of every
//! state (C1 controls and CAN/SUB/ESC behave the same regardless of state).
//! [`Table::build`] materializes the rules once into a dense array indexed by
//! state and code point, so parse-time lookups never walk ranges. Bytes
//! 0xA0..=0xFF are folded into the GL area with [`fold`] before lookup; the
//! dense array only covers 0x00..=0x9F.

use std::sync::LazyLock;

use crate::enums::{Action, State};

/// Code points covered by the dense table, 0x00..=0x9F.
pub(crate) const TABLE_LEN: usize = 0xA0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition {
    /// `None` stays in the current state.
    pub target: Option<State>,
    pub action: Option<Action>,
}

impl Transition {
    const STAY: Transition = Transition {
        target: None,
        action: None,
    };
}

fn stay(action: Action) -> Transition {
    Transition {
        target: None,
        action: Some(action),
    }
}

fn to(target: State) -> Transition {
    Transition {
        target: Some(target),
        action: None,
    }
}

fn to_with(target: State, action: Action) -> Transition {
    Transition {
        target: Some(target),
        action: Some(action),
    }
}

/// Inclusive code point ranges; a single code is `(x, x)`.
type Ranges = &'static [(u8, u8)];

/// C0 controls without CAN, SUB and ESC (those live in the anywhere rules).
const NORMAL_C0: Ranges = &[(0x00, 0x17), (0x19, 0x19), (0x1c, 0x1f)];

/// Rules applied to every state after its own, so they win ties.
fn anywhere_rules() -> Vec<(Ranges, Transition)> {
    use Action::*;
    use State::*;

    vec![
        // CAN, SUB
        (&[(0x18, 0x18), (0x1a, 0x1a)], to_with(Ground, Execute)),
        // ESC
        (&[(0x1b, 0x1b)], to(Escape)),
        // C1 (8-bit) introducers
        (&[(0x90, 0x90)], to(DcsEntry)),
        (&[(0x9b, 0x9b)], to(CsiEntry)),
        (&[(0x9d, 0x9d)], to(OscString)),
        // SOS, PM, APC
        (&[(0x98, 0x98), (0x9e, 0x9f)], to(OtherString)),
        // ST
        (&[(0x9c, 0x9c)], to_with(Ground, Ignore)),
        // all other undefined C1 controls
        (
            &[(0x80, 0x8f), (0x91, 0x97), (0x99, 0x9a)],
            to_with(Ground, Execute),
        ),
    ]
}

/// State-specific rules, before the anywhere overrides. Within one list a
/// later rule overwrites an earlier one for the same code point.
fn state_rules(state: State) -> Vec<(Ranges, Transition)> {
    use Action::*;
    use State::*;

    match state {
        Ground => vec![
            (NORMAL_C0, stay(Execute)),
            (&[(0x20, 0x7f)], stay(Print)),
        ],
        Escape => vec![
            (NORMAL_C0, stay(Execute)),
            (&[(0x20, 0x2f)], to_with(EscapeIntermediate, Collect)),
            (
                &[
                    (0x30, 0x4f),
                    (0x51, 0x57),
                    (0x59, 0x59),
                    (0x5a, 0x5a),
                    (0x5c, 0x5c),
                    (0x60, 0x7e),
                ],
                to_with(Ground, EscDispatch),
            ),
            (&[(0x50, 0x50)], to(DcsEntry)),
            (&[(0x5b, 0x5b)], to(CsiEntry)),
            (&[(0x5d, 0x5d)], to(OscString)),
            (&[(0x58, 0x58), (0x5e, 0x5f)], to(OtherString)),
            (&[(0x7f, 0x7f)], stay(Ignore)),
        ],
        EscapeIntermediate => vec![
            (NORMAL_C0, stay(Execute)),
            (&[(0x20, 0x2f)], stay(Collect)),
            (&[(0x30, 0x7e)], to_with(Ground, EscDispatch)),
            (&[(0x7f, 0x7f)], stay(Ignore)),
        ],
        CsiEntry => vec![
            (NORMAL_C0, stay(Execute)),
            (&[(0x20, 0x2f)], to_with(CsiIntermediate, Collect)),
            (&[(0x30, 0x39), (0x3b, 0x3b)], to_with(CsiParam, Param)),
            // `:` opens a sub-parameter (ECMA-48 5.4.2)
            (&[(0x3a, 0x3a)], to_with(CsiParam, Param)),
            (&[(0x3c, 0x3f)], to_with(CsiParam, Collect)),
            (&[(0x40, 0x7e)], to_with(Ground, CsiDispatch)),
            (&[(0x7f, 0x7f)], stay(Ignore)),
        ],
        CsiParam => vec![
            (NORMAL_C0, stay(Execute)),
            (&[(0x20, 0x2f)], to_with(CsiIntermediate, Collect)),
            (&[(0x30, 0x39), (0x3b, 0x3b)], stay(Param)),
            // `:` opens a sub-parameter (ECMA-48 5.4.2)
            (&[(0x3a, 0x3a)], stay(Param)),
            (&[(0x3c, 0x3f)], to(CsiIgnore)),
            (&[(0x40, 0x7e)], to_with(Ground, CsiDispatch)),
            (&[(0x7f, 0x7f)], stay(Ignore)),
        ],
        CsiIntermediate => vec![
            (NORMAL_C0, stay(Execute)),
            (&[(0x20, 0x2f)], stay(Collect)),
            (&[(0x30, 0x3f)], to(CsiIgnore)),
            (&[(0x40, 0x7e)], to_with(Ground, CsiDispatch)),
            (&[(0x7f, 0x7f)], stay(Ignore)),
        ],
        CsiIgnore => vec![
            (NORMAL_C0, stay(Execute)),
            (&[(0x20, 0x3f), (0x7f, 0x7f)], stay(Ignore)),
            (&[(0x40, 0x7e)], to(Ground)),
        ],
        DcsEntry => vec![
            (NORMAL_C0, stay(Ignore)),
            (&[(0x20, 0x2f)], to_with(DcsIntermediate, Collect)),
            (&[(0x30, 0x39), (0x3b, 0x3b)], to_with(DcsParam, Param)),
            (&[(0x3a, 0x3a)], to(DcsIgnore)),
            (&[(0x3c, 0x3f)], to_with(DcsParam, Collect)),
            (&[(0x40, 0x7e)], to(DcsPassthrough)),
            (&[(0x7f, 0x7f)], stay(Ignore)),
        ],
        DcsParam => vec![
            (NORMAL_C0, stay(Ignore)),
            (&[(0x20, 0x2f)], to_with(DcsIntermediate, Collect)),
            (&[(0x30, 0x39), (0x3b, 0x3b)], stay(Param)),
            (&[(0x3a, 0x3a), (0x3c, 0x3f)], to(DcsIgnore)),
            (&[(0x40, 0x7e)], to(DcsPassthrough)),
            (&[(0x7f, 0x7f)], stay(Ignore)),
        ],
        DcsIntermediate => vec![
            (NORMAL_C0, stay(Ignore)),
            (&[(0x20, 0x2f)], stay(Collect)),
            (&[(0x30, 0x3f)], to(DcsIgnore)),
            (&[(0x40, 0x7e)], to(DcsPassthrough)),
            (&[(0x7f, 0x7f)], stay(Ignore)),
        ],
        DcsPassthrough => vec![
            (NORMAL_C0, stay(Put)),
            (&[(0x20, 0x7e)], stay(Put)),
            (&[(0x7f, 0x7f)], stay(Ignore)),
        ],
        DcsIgnore => vec![
            (NORMAL_C0, stay(Ignore)),
            (&[(0x20, 0x7f)], stay(Ignore)),
        ],
        OscString => vec![
            (NORMAL_C0, stay(Ignore)),
            (&[(0x20, 0x7f)], stay(OscPut)),
            // XTerm accepts BEL as an OSC terminator; overrides the C0 rule.
            (&[(0x07, 0x07)], to_with(Ground, Ignore)),
        ],
        OtherString => vec![
            (NORMAL_C0, stay(Ignore)),
            (&[(0x20, 0x7f)], stay(Ignore)),
        ],
    }
}

/// Action fired on entering a state, before the next code point is read.
pub(crate) const fn entry_action(state: State) -> Option<Action> {
    use Action::*;
    use State::*;

    match state {
        Escape | CsiEntry | DcsEntry => Some(Clear),
        DcsPassthrough => Some(Hook),
        OscString => Some(OscStart),
        _ => None,
    }
}

/// Action fired on leaving a state, before the transition's own action.
pub(crate) const fn exit_action(state: State) -> Option<Action> {
    use Action::*;
    use State::*;

    match state {
        DcsPassthrough => Some(Unhook),
        OscString => Some(OscEnd),
        _ => None,
    }
}

/// C1-area 8-bit codes (0xA0..=0xFF) share GL semantics; fold them into the
/// table's 0x00..=0x9F domain before lookup.
#[inline]
pub(crate) const fn fold(byte: u8) -> u8 {
    if byte >= 0xa0 { byte & 0x7f } else { byte }
}

fn apply(
    dense: &mut [Option<Transition>; TABLE_LEN],
    rules: &[(Ranges, Transition)],
) {
    for (ranges, transition) in rules {
        for &(start, stop) in *ranges {
            for code in start..=stop {
                dense[usize::from(code)] = Some(*transition);
            }
        }
    }
}

/// Expand the sparse rules into one dense row per state. Entries left `None`
/// are gaps in the rule set; [`Table::build`] reports and papers over them.
fn resolve() -> [[Option<Transition>; TABLE_LEN]; State::COUNT] {
    let mut dense = [[None; TABLE_LEN]; State::COUNT];
    let anywhere = anywhere_rules();

    for state in State::ALL {
        let row = &mut dense[state.index()];
        apply(row, &state_rules(state));
        apply(row, &anywhere);
    }

    dense
}

pub(crate) struct Table {
    transitions: [[Transition; TABLE_LEN]; State::COUNT],
}

impl Table {
    fn build() -> Self {
        let resolved = resolve();

        for state in State::ALL {
            for (code, entry) in resolved[state.index()].iter().enumerate() {
                if entry.is_none() {
                    log::warn!("missing transition in {state:?} at {code:#04x}");
                }
            }
        }

        Table {
            transitions: resolved
                .map(|row| row.map(|entry| entry.unwrap_or(Transition::STAY))),
        }
    }

    /// Dense lookup. `code` must already be folded into 0x00..=0x9F.
    #[inline]
    pub(crate) fn lookup(&self, state: State, code: u8) -> Transition {
        self.transitions[state.index()][usize::from(code)]
    }
}

/// Process-wide table, built once and shared by every parser instance.
pub(crate) fn table() -> &'static Table {
    static TABLE: LazyLock<Table> = LazyLock::new(Table::build);
    &TABLE
}
