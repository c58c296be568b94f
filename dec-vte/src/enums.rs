/// States of the escape sequence recognizer, one per node of the DEC ANSI
/// parser state diagram. Exactly one state is current at any time, and the
/// transition table defines a target for every (state, code point) pair.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    #[default]
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    DcsIgnore,
    OscString,
    /// SOS, PM and APC strings share one collection state.
    OtherString,
}

impl State {
    pub(crate) const COUNT: usize = 14;

    pub(crate) const ALL: [State; Self::COUNT] = [
        State::Ground,
        State::Escape,
        State::EscapeIntermediate,
        State::CsiEntry,
        State::CsiParam,
        State::CsiIntermediate,
        State::CsiIgnore,
        State::DcsEntry,
        State::DcsParam,
        State::DcsIntermediate,
        State::DcsPassthrough,
        State::DcsIgnore,
        State::OscString,
        State::OtherString,
    ];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// One unit of observable parser output.
///
/// `Ignore`, `Clear`, `Collect` and `Param` are handled inside the parser;
/// the remaining actions reach the [`Actor`](crate::Actor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Ignore,
    Print,
    Execute,
    Clear,
    Collect,
    Param,
    EscDispatch,
    CsiDispatch,
    Hook,
    Put,
    Unhook,
    OscStart,
    OscPut,
    OscEnd,
}
