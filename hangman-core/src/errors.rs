use hangman_types::{PlayerId, RoomId};

/// How a failure should be surfaced to the client that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Forbidden,
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("Room {room_id} not found")]
    RoomNotFound { room_id: RoomId },
    #[error("Player {player_id} is not in this room")]
    PlayerNotFound { player_id: PlayerId },
    #[error("Letter '{letter}' has already been guessed")]
    DuplicateGuess { letter: char },
    #[error("Invalid word: '{word}'")]
    InvalidWord { word: String },
    #[error("Invalid letter: '{letter}'")]
    InvalidLetter { letter: String },
    #[error("Player name must not be blank")]
    InvalidName { name: String },
    #[error("It is not your turn")]
    NotTurnHolder,
    #[error("Only the room master can do that")]
    NotMaster,
    #[error("Players can only remove themselves")]
    NotSelf,
    #[error("The room master cannot guess the word")]
    MasterCannotGuess,
    #[error("A word is already set for this round")]
    WordAlreadySet,
    #[error("No word has been set yet")]
    NoWordSet,
    #[error("The word has already been completed")]
    WordComplete,
    #[error("At least one player besides the master is required")]
    NotEnoughPlayers,
}

impl RoomError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RoomError::RoomNotFound { .. } | RoomError::PlayerNotFound { .. } => ErrorKind::NotFound,
            RoomError::DuplicateGuess { .. }
            | RoomError::InvalidWord { .. }
            | RoomError::InvalidLetter { .. }
            | RoomError::InvalidName { .. } => ErrorKind::BadRequest,
            RoomError::NotTurnHolder
            | RoomError::NotMaster
            | RoomError::NotSelf
            | RoomError::MasterCannotGuess => ErrorKind::Forbidden,
            RoomError::WordAlreadySet
            | RoomError::NoWordSet
            | RoomError::WordComplete
            | RoomError::NotEnoughPlayers => ErrorKind::Conflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            RoomError::RoomNotFound {
                room_id: Uuid::new_v4()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            RoomError::DuplicateGuess { letter: 'a' }.kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(RoomError::NotTurnHolder.kind(), ErrorKind::Forbidden);
        assert_eq!(RoomError::NotMaster.kind(), ErrorKind::Forbidden);
        assert_eq!(RoomError::NotSelf.kind(), ErrorKind::Forbidden);
        assert_eq!(
            RoomError::InvalidName {
                name: "  ".to_string()
            }
            .kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(RoomError::WordAlreadySet.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_error_messages() {
        let err = RoomError::DuplicateGuess { letter: 'e' };
        assert_eq!(err.to_string(), "Letter 'e' has already been guessed");

        let err = RoomError::InvalidWord {
            word: "ab1".to_string(),
        };
        assert!(err.to_string().contains("Invalid word"));
    }
}
