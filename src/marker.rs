//! Completion marker detection.
//!
//! The agent signals success by embedding a `<promise>VALUE</promise>` tag
//! in its output. The scan is a single linear pass and only the first
//! occurrence counts; later markers in the same output are ignored.

const OPEN_TAG: &str = "<promise>";
const CLOSE_TAG: &str = "</promise>";

/// Find the first completion marker in the agent output.
///
/// Returns the marker value verbatim (it may be empty or span lines). An
/// open tag without a matching close tag is not a marker.
pub fn find_promise(output: &str) -> Option<&str> {
    let start = output.find(OPEN_TAG)? + OPEN_TAG.len();
    let end = output[start..].find(CLOSE_TAG)?;
    Some(&output[start..start + end])
}
