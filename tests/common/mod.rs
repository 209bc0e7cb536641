use assert_cmd::Command;
use std::path::Path;

pub fn periodical_cmd() -> Command {
    let mut cmd = Command::cargo_bin("periodical").unwrap();
    cmd.env_remove("PERIODICAL_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Initialize a workspace holding one block in January 1850 with a
/// Monday issue
#[allow(dead_code)]
pub fn init_with_block(root: &Path) {
    periodical_cmd().arg("init").arg(root).assert().success();
    periodical_cmd()
        .current_dir(root)
        .args(["block", "add", "--first", "1.1.1850", "--last", "31.1.1850"])
        .assert()
        .success();
    periodical_cmd()
        .current_dir(root)
        .args(["issue", "add", "1", "Morning", "--days", "mon"])
        .assert()
        .success();
}
