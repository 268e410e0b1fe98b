use std::env;

/// Build-time capacity settings: (environment variable, default)
const SETTINGS: [(&str, &str); 3] = [
    // NT: number of task slots in the store
    ("RT_TASKMON_MAX_TASKS", "32"),
    // CAP: response-time samples kept per task
    ("RT_TASKMON_HISTORY_CAPACITY", "10000"),
    // Priority ceiling for spawners that cannot query the OS
    ("RT_TASKMON_MAX_PRIORITY", "99"),
];

fn main() {
    for (name, default) in SETTINGS {
        match env::var(name) {
            Ok(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    panic!("{} must be a non-negative integer, got {:?}", name, value);
                }
                println!("cargo:rustc-env={}={}", name, trimmed);
                println!("cargo:warning=Using {} from environment: {}", name, trimmed);
            }
            Err(_) => {
                println!("cargo:rustc-env={}={}", name, default);
            }
        }

        // Rerun if environment variables change
        println!("cargo:rerun-if-env-changed={}", name);
    }
}
