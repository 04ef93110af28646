use std::process::Command;

#[test]
fn headless_sidebar_smoke() {
    let bin = env!("CARGO_BIN_EXE_hudline-app");
    let mut cmd = Command::new(bin);
    cmd.env("HUDLINE_HEADLESS", "1")
        .env("HUDLINE_HEADLESS_FRAMES", "6")
        .env("RUST_LOG", "off");

    let status = cmd.status().expect("failed to run hudline-app binary");
    assert!(status.success(), "headless sidebar run failed");
}
