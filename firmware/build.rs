//! This build script copies the `memory.x` file from the crate root into a directory where
//! the linker can always find it at build time, and bakes the watch configuration into
//! `config.rs`.

use std::{env, fs::File, io::Write, path::PathBuf};

/// Offset of local time to UTC in seconds
const DEFAULT_UTC_OFFSET: i32 = 1 * 3_600;

fn main() {
    // Put memory layout in the output directory and ensure it's on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // Build time as the initial clock, plus the user settings
    let utc_offset = env::var("DIGITAL_FACE_UTC_OFFSET")
        .ok()
        .and_then(|offset| offset.parse::<i32>().ok())
        .unwrap_or(DEFAULT_UTC_OFFSET);
    let clock_24h_style = env::var("DIGITAL_FACE_24H")
        .map(|style| matches!(style.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    File::create(out.join("config.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const UTC_EPOCH: i64 = {:?};\nconst UTC_OFFSET: i32 = {:?};\nconst CLOCK_24H_STYLE: bool = {:?};\n",
            chrono::offset::Utc::now().timestamp(),
            utc_offset,
            clock_24h_style,
        ))
        .unwrap();

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-env-changed=DIGITAL_FACE_UTC_OFFSET");
    println!("cargo:rerun-if-env-changed=DIGITAL_FACE_24H");
}
