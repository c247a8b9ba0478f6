use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("donut-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create scratch directory");
    dir
}

fn donut() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_donut"));
    cmd.env("RUST_LOG", "info").env("NO_COLOR", "1");
    cmd
}

#[test]
fn headless_run_writes_snapshots() {
    let dir = scratch_dir("snapshots");
    let output = donut()
        .args(["--headless", "--frames", "3", "--width", "160", "--height", "120"])
        .arg("--snapshot-dir")
        .arg(&dir)
        .output()
        .expect("Failed to spawn donut");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "donut failed:\n{stdout}\n{stderr}");
    assert!(
        stdout.contains("animation finished after 3 frames"),
        "unexpected log output:\n{stdout}"
    );

    let pngs = fs::read_dir(&dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "png"))
        .count();
    assert_eq!(pngs, 3);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn config_file_is_applied() {
    let dir = scratch_dir("config");
    let config = dir.join("donut.json");
    fs::write(
        &config,
        r#"{ "canvas": { "width": 90, "height": 70 }, "run": { "frames": 2, "snapshot_every": 2 } }"#,
    )
    .unwrap();
    let output = donut()
        .arg("--headless")
        .arg("--config")
        .arg(&config)
        .arg("--snapshot-dir")
        .arg(dir.join("frames"))
        .output()
        .expect("Failed to spawn donut");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let snapshots: Vec<_> = fs::read_dir(dir.join("frames")).unwrap().collect();
    assert_eq!(snapshots.len(), 1);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn viewer_inside_torus_fails_fast() {
    let dir = scratch_dir("invalid");
    let config = dir.join("donut.json");
    fs::write(&config, r#"{ "projection": { "viewer_distance": 0.5 } }"#).unwrap();
    let output = donut()
        .args(["--headless", "--frames", "1", "--config"])
        .arg(&config)
        .output()
        .expect("Failed to spawn donut");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("viewer distance 0.5"), "{stderr}");
    fs::remove_dir_all(&dir).unwrap();
}
