use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    MissingSeparator(String),

    #[error("Key cannot be empty in assignment '{0}'.")]
    EmptyKey(String),
}

/// Splits a `KEY=VALUE` assignment at the first `=`.
///
/// The key is trimmed; the value is kept verbatim so it may itself contain `=`
/// or surrounding whitespace (e.g. a full `mpirun` command line).
pub fn parse_assignment(assignment: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(assignment.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(assignment.to_string()));
    }
    Ok((key, value))
}
