use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::process::Command;
use std::thread;

use bytes::BytesMut;
use stubrun_frame::codec::argv_frame;

const APP_PATH: &str = "/apps/Demo.app/Demo";

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stubrun-cli-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Read one `$..#cc` frame off the wire.
fn read_frame(stream: &mut TcpStream) -> Vec<u8> {
    let mut frame = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        stream.read_exact(&mut byte).expect("frame read");
        frame.push(byte[0]);
        if frame.len() >= 3 && frame[frame.len() - 3] == b'#' {
            return frame;
        }
    }
}

fn expect_bytes(stream: &mut TcpStream, expected: &[u8]) {
    let mut buf = vec![0u8; expected.len()];
    stream.read_exact(&mut buf).expect("literal read");
    assert_eq!(buf, expected);
}

/// Scripted stub: walks the whole launch handshake, emits one console
/// frame, then reports the given terminal frame.
fn scripted_stub(listener: TcpListener, terminal_frame: &'static [u8]) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("stub accept");

        // argv upload
        let frame = read_frame(&mut stream);
        let mut expected = BytesMut::new();
        argv_frame(APP_PATH, 0, &mut expected);
        assert_eq!(frame, expected.to_vec());
        stream.write_all(b"+$OK#9a").unwrap();
        expect_bytes(&mut stream, b"+");

        // launch-success query
        expect_bytes(&mut stream, b"$qLaunchSuccess#a5");
        stream.write_all(b"+$OK#9a").unwrap();
        expect_bytes(&mut stream, b"+");

        // continue
        expect_bytes(&mut stream, b"$c#63");
        stream.write_all(b"+").unwrap();

        // one console frame, acknowledged in lock-step
        stream.write_all(b"$O68690a#bd").unwrap();
        expect_bytes(&mut stream, b"+$?#3f");
        stream.write_all(b"+").unwrap();

        stream.write_all(terminal_frame).unwrap();
    })
}

#[test]
fn run_passes_through_console_output_and_exit_status() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let stub = scripted_stub(listener, b"$W2a#ea");

    let output = Command::new(env!("CARGO_BIN_EXE_stubrun"))
        .args(["run", &addr, APP_PATH])
        .output()
        .expect("binary should run");

    stub.join().expect("stub thread should complete");
    assert_eq!(output.status.code(), Some(42));
    assert_eq!(output.stdout, b"hi\n");
}

#[test]
fn run_reports_signal_termination_as_128_plus() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let stub = scripted_stub(listener, b"$X0b#ea");

    let output = Command::new(env!("CARGO_BIN_EXE_stubrun"))
        .args(["run", &addr, APP_PATH, "--format", "json"])
        .output()
        .expect("binary should run");

    stub.join().expect("stub thread should complete");
    assert_eq!(output.status.code(), Some(139));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let summary = stdout.lines().last().expect("summary line");
    assert!(summary.contains("\"kind\":\"signaled\""));
    assert!(summary.contains("\"signal\":11"));
}

#[test]
fn run_fails_cleanly_on_rejected_upload() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let stub = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("stub accept");
        let _ = read_frame(&mut stream);
        stream.write_all(b"-").unwrap();
    });

    let output = Command::new(env!("CARGO_BIN_EXE_stubrun"))
        .args(["run", &addr, APP_PATH])
        .output()
        .expect("binary should run");

    stub.join().expect("stub thread should complete");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("argv upload rejected"));
}

#[test]
fn resolve_prints_the_executable_path() {
    let dir = unique_temp_dir("resolve");
    let catalog = dir.join("apps.json");
    std::fs::write(
        &catalog,
        r#"[{"bundle_id":"com.example.alpha","display_name":"Alpha",
            "path":"/apps/Alpha.app","executable":"Alpha"}]"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_stubrun"))
        .args(["resolve", "Alpha", "--catalog"])
        .arg(&catalog)
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"/apps/Alpha.app/Alpha\n");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn resolve_unknown_app_fails() {
    let dir = unique_temp_dir("resolve-missing");
    let catalog = dir.join("apps.json");
    std::fs::write(&catalog, "[]").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_stubrun"))
        .args(["resolve", "Ghost", "--catalog"])
        .arg(&catalog)
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no app found"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_stubrun"))
        .args(["version"])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("stubrun "));
}
