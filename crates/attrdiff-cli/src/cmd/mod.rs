/// Command module for the `attrdiff` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments and returns `Ok(())` on success or
/// a [`crate::error::CliError`] on failure.
pub mod compare;
pub mod options;
pub mod select;
pub mod summary;

use crate::cli::{Cli, Command, PathOrStdin};
use crate::error::CliError;
use crate::format::FormatterConfig;

/// Routes the parsed command line to its subcommand.
///
/// # Errors
///
/// Whatever the subcommand returns, plus [`CliError::InvalidArgument`] when
/// both tree arguments are `-`.
pub fn dispatch(cli: &Cli) -> Result<(), CliError> {
    let config = FormatterConfig::from_flags(cli.no_color, cli.quiet, cli.verbose);
    match &cli.command {
        Command::Compare {
            expected,
            found,
            args,
            collect,
        } => {
            reject_double_stdin(expected, found)?;
            compare::run(
                expected,
                found,
                args,
                *collect,
                cli.format,
                cli.max_file_size,
                &config,
            )
        }
        Command::Summary {
            expected,
            found,
            args,
            strict,
        } => {
            reject_double_stdin(expected, found)?;
            summary::run(
                expected,
                found,
                args,
                *strict,
                cli.format,
                cli.max_file_size,
                &config,
            )
        }
        Command::Select { file, pattern } => {
            select::run(file, pattern, cli.format, cli.max_file_size, &config)
        }
    }
}

fn reject_double_stdin(expected: &PathOrStdin, found: &PathOrStdin) -> Result<(), CliError> {
    if expected.is_stdin() && found.is_stdin() {
        return Err(CliError::InvalidArgument {
            detail: "EXPECTED and FOUND cannot both be read from stdin".to_owned(),
        });
    }
    Ok(())
}
