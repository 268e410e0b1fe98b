//! Build-time configuration
//!
//! Capacities are fixed when the crate is compiled. `build.rs` forwards the
//! optional environment variables below (or their defaults) to the compiler
//! and this module parses them in const context, so a malformed value is a
//! build error rather than a runtime surprise.
//!
//! | Variable | Default | Constant |
//! |---|---|---|
//! | `RT_TASKMON_MAX_TASKS` | 32 | [`MAX_TASKS`] |
//! | `RT_TASKMON_HISTORY_CAPACITY` | 10000 | [`HISTORY_CAPACITY`] |
//! | `RT_TASKMON_MAX_PRIORITY` | 99 | [`MAX_PRIORITY`] |

/// Maximum number of tasks the store can hold (`NT`)
pub const MAX_TASKS: usize = parse_usize(env!("RT_TASKMON_MAX_TASKS"));

/// Response-time samples kept per task (`CAP`)
pub const HISTORY_CAPACITY: usize = parse_usize(env!("RT_TASKMON_HISTORY_CAPACITY"));

/// Priority ceiling used when the OS cannot be queried
pub const MAX_PRIORITY: u8 = {
    let value = parse_usize(env!("RT_TASKMON_MAX_PRIORITY"));
    assert!(value <= u8::MAX as usize, "RT_TASKMON_MAX_PRIORITY must fit in a u8");
    value as u8
};

const _: () = assert!(MAX_TASKS > 0, "RT_TASKMON_MAX_TASKS must be positive");
const _: () = assert!(HISTORY_CAPACITY > 0, "RT_TASKMON_HISTORY_CAPACITY must be positive");

/// Decimal string to `usize`, usable in const context
const fn parse_usize(value: &str) -> usize {
    let bytes = value.as_bytes();
    assert!(!bytes.is_empty(), "empty numeric setting");

    let mut result: usize = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "numeric setting contains a non-digit");
        result = match result.checked_mul(10) {
            Some(shifted) => match shifted.checked_add((digit - b'0') as usize) {
                Some(next) => next,
                None => panic!("numeric setting overflows usize"),
            },
            None => panic!("numeric setting overflows usize"),
        };
        i += 1;
    }
    result
}
