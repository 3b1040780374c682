//! Reporting the outcome of a deployment to the user

use std::io::{self, Write};

use tracing::error;

use crate::{
    constants::{FAILURE_EXIT_CODE, FAILURE_PREFIX, SUCCESS_EXIT_CODE},
    errors::DeployError,
    types::DeploymentResult,
};

/// Report the outcome of a deployment on stdout / stderr, returning the
/// process exit code
pub fn report(result: Result<DeploymentResult, DeployError>) -> u8 {
    write_report(result, &mut io::stdout().lock(), &mut io::stderr().lock())
}

/// Write the outcome of a deployment: the success line to `stdout`, or the
/// failure line to `stderr`. Returns the process exit code.
pub fn write_report(
    result: Result<DeploymentResult, DeployError>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> u8 {
    match result {
        Ok(deployment) => match writeln!(stdout, "{}", deployment) {
            Ok(()) => SUCCESS_EXIT_CODE,
            Err(e) => {
                error!(error = %e, "failed to write deployment result");
                FAILURE_EXIT_CODE
            }
        },
        Err(e) => {
            // Nowhere left to report a failed write to stderr
            let _ = writeln!(stderr, "{} {}", FAILURE_PREFIX, e);
            FAILURE_EXIT_CODE
        }
    }
}
