/// Thrown on submission to a pool that is no longer running
#[derive(Debug, PartialEq, Eq)]
pub enum ExecError {
    Terminated,
}
