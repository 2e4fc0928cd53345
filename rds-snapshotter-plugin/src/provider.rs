use rds_snapshotter_models::errors::SendableError;

/// Contract a host runtime uses to invoke a stage.
///
/// `args` is the stage input as JSON. `Ok` carries the exit code of the call; a stage
/// that ends in a terminal state reports it as `Err`.
pub trait Provider: Send + Sync {
    fn name(&self) -> String;
    fn call_service(&self, call: String, args: String, timeout_secs: i64) -> Result<i32, SendableError>;
}
