use std::path::Path;

use crate::assignment::Assignment;
use crate::process::{Execute, SENTINEL_EXIT_CODE};
use crate::sink::Sink;

/// Returns the build's exit code; anything but 0 means the submission did not build.
pub async fn build(
    exec: &dyn Execute,
    sink: &dyn Sink,
    assignment: Assignment,
    submission: &Path,
) -> i32 {
    sink.info("Building submission");
    let cmd = assignment.build_command();
    let res = match exec.execute(&cmd, submission).await {
        Ok(res) => res,
        Err(e) => {
            sink.error(&format!("{:#}", e));
            return SENTINEL_EXIT_CODE;
        }
    };

    let code = res.exit_code();
    if code != 0 && !res.timed_out {
        sink.error(&format!(
            "Got return value {} while building, stopping this build",
            code
        ));
    }
    code
}
