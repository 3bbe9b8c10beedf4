// build.rs — platform detection for the postgres entry routine.
//
// Emits `cargo:rustc-cfg=exec_backend` when the server emulates fork() by
// re-executing its own binary. Windows has no fork(), so it always does;
// elsewhere the `exec-backend` feature opts in (handy for exercising the
// Windows code path on Unix).
fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let feature_on = std::env::var("CARGO_FEATURE_EXEC_BACKEND").is_ok();
    if target_os == "windows" || feature_on {
        println!("cargo:rustc-cfg=exec_backend");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
