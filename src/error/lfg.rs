use thiserror::Error;

/// Errors raised by LFG lookups and roster operations.
///
/// All variants except `CorruptRow` are recoverable user errors whose display text
/// is shown to the member who issued the command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LfgError {
    /// No LFG with this id exists in the registry.
    #[error("LFG with id {0} does not exist :(")]
    NotFound(i32),

    /// The member is already a participant.
    #[error("You already joined this LFG!")]
    AlreadyJoined,

    /// The member is already an alternative.
    #[error("You are already an alternative for this LFG!")]
    AlreadyAlternative,

    /// The member is in neither roster.
    #[error("You are not part of this LFG!")]
    NotJoined,

    /// The LFG was deleted and recreated, or edited by someone else, while an edit
    /// prompt was collecting answers.
    #[error("LFG {0} changed while it was being edited, please try again")]
    ChangedDuringEdit(i32),

    /// A persisted row does not satisfy the `lfg` table contract.
    #[error("Stored lfg row {id} is invalid: {reason}")]
    CorruptRow {
        /// Row id
        id: i32,
        /// What was wrong with the row
        reason: String,
    },
}
