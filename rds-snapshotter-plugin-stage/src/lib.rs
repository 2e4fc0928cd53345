use std::ffi::{c_char, c_int};

use log::error;
use rds_snapshotter_provider_aws::config::DispatcherConfig;
use rds_snapshotter_provider_aws::RdsSnapshotterProvider;
use rds_snapshotter_utilities::{ffiutils, logger};

const NAME: &str = "rdsSnapshotter\0";

const CALL_SUCCEEDED: c_int = 0;
const CALL_TERMINAL: c_int = 1;
const CALL_INVALID: c_int = -1;

#[cfg(not(test))]
#[ctor::ctor]
fn constructor() {
    if logger::setup_logger().is_ok() {
        log::info!("RdsSnapshotterPlugin.start()");
    }
}

#[no_mangle]
pub extern "C" fn snapshotter_marker() -> c_int {
    1
}

#[no_mangle]
pub extern "C" fn name() -> *const c_char {
    ffiutils::str_to_c_string(NAME)
}

/// Runs the stage for one pipeline invocation.
///
/// Returns 0 when the snapshot was started, 1 when the stage ended terminal and -1
/// when the call itself could not be understood.
///
/// # Safety
///
/// `call` and `args` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn call_service(
    call: *const c_char,
    args: *const c_char,
    timeout_secs: i64,
) -> c_int {
    if call.is_null() || args.is_null() {
        error!("call_service invoked with a null argument");
        return CALL_INVALID;
    }

    let (call, args) = match unsafe {
        (
            ffiutils::cstr_to_rust_string(call),
            ffiutils::cstr_to_rust_string(args),
        )
    } {
        (Ok(call), Ok(args)) => (call, args),
        _ => {
            error!("call_service arguments are not valid UTF-8");
            return CALL_INVALID;
        }
    };

    let provider = RdsSnapshotterProvider::from_env(DispatcherConfig::default());
    match provider.run_call(&call, &args, timeout_secs) {
        Ok(outcome) if outcome.is_succeeded() => CALL_SUCCEEDED,
        Ok(outcome) => {
            error!(
                "Stage ended terminal: {}",
                outcome.error_message().unwrap_or_default()
            );
            CALL_TERMINAL
        }
        Err(err) => {
            error!("Error running stage: {}", err);
            CALL_INVALID
        }
    }
}
