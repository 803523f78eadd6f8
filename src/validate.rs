use crate::error::CliError;

/// Checks that a subcommand received exactly `expected` positional arguments.
pub fn check_arity(args: &[String], expected: usize, usage: &str) -> Result<(), CliError> {
    if args.len() != expected {
        return Err(CliError::Usage {
            usage: usage.to_string(),
        });
    }
    Ok(())
}

/// Rejects ids that cannot name a single volume.
pub fn check_id(id: &str) -> Result<(), CliError> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(CliError::InvalidInput(format!("invalid volume id '{id}'")));
    }
    Ok(())
}

/// Parses a size argument. Sizes are whole, positive units.
pub fn parse_size(raw: &str) -> Result<i64, CliError> {
    match raw.parse::<i64>() {
        Ok(size) if size > 0 => Ok(size),
        Ok(_) => Err(CliError::InvalidInput(String::from(
            "input size is not valid. It must be a positive integer.",
        ))),
        Err(_) => Err(CliError::InvalidInput(String::from(
            "input size is not valid. It only support integer.",
        ))),
    }
}
