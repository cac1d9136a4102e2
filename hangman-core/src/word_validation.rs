use crate::RoomError;

/// Lower-case a single letter. Letters whose lower-case form expands to more
/// than one character are kept as they are.
pub fn fold_letter(letter: char) -> char {
    let mut lower = letter.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => letter,
    }
}

/// Check if word contains only alphabetic characters
pub fn is_alphabetic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_alphabetic())
}

/// Validate a secret word or a whole-word guess and return its folded letters.
pub fn normalize_word(word: &str) -> Result<Vec<char>, RoomError> {
    let trimmed = word.trim();
    if !is_alphabetic(trimmed) {
        return Err(RoomError::InvalidWord {
            word: word.to_string(),
        });
    }

    Ok(trimmed.chars().map(fold_letter).collect())
}

/// Validate a letter guess submitted as text. Exactly one letter is accepted.
pub fn normalize_letter(input: &str) -> Result<char, RoomError> {
    let mut chars = input.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_alphabetic() => Ok(fold_letter(letter)),
        _ => Err(RoomError::InvalidLetter {
            letter: input.to_string(),
        }),
    }
}

/// Trim a display name, rejecting names with nothing left.
pub fn normalize_name(name: &str) -> Result<&str, RoomError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RoomError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(trimmed)
}
