/// Everything the user (or the clock) can ask the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `q`: ask for confirmation, or confirm when already asking.
    Quit,
    /// Ctrl+C: leave immediately.
    ForceQuit,
    NavigateBack,
    MoveDown,
    MoveUp,
    DrillIn,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    /// `o`: the "select file" button.
    SelectFile,
    CopyRecord,
    CopyAll,
    Export,
    ToggleHelp,
    /// Bracketed paste, which is what terminals emit for a dropped file.
    Paste(String),
    Resize(u16, u16),
    Tick,
    None,
}
