use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new(zshrc: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::write(dir.path().join(".zshrc"), zshrc).expect("write zshrc");
        Env { dir }
    }

    fn input(&self) -> PathBuf {
        self.dir.path().join(".zshrc")
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("fish").join("config.fish")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("zsh2fish").unwrap();
        cmd.env("HOME", self.dir.path())
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("ZSH2FISH_LOG");
        cmd
    }

    fn migrate(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--input").arg(self.input()).arg("--output").arg(self.output());
        cmd
    }

    fn written(&self) -> String {
        fs::read_to_string(self.output()).expect("output written")
    }
}

#[test]
fn clean_config_migrates_without_questions() {
    let env = Env::new("alias ll='ls -la'\nexport EDITOR=vim\nfoo () {\n  echo hi\n}\n");
    env.migrate()
        .write_stdin("")
        .assert()
        .success()
        .stdout(contains("Migration complete!"))
        .stdout(contains("All lines were migrated or handled!"))
        .stdout(contains("What do you want to do?").not());

    let out = env.written();
    assert!(out.contains("# Aliases\nalias ll=\"ls -la\"\n"));
    assert!(out.contains("# Environment Variables\nset -gx EDITOR vim\n"));
    assert!(out.contains("# Functions\nfunction foo\n      echo hi\nend\n"));
}

#[test]
fn answers_are_read_from_stdin() {
    let env = Env::new("echo one\necho two\necho three\n");
    env.migrate()
        .write_stdin("5\necho fish one\n6\n3\n")
        .assert()
        .success()
        .stdout(contains("Cannot confidently migrate: \"echo one\"."))
        .stdout(contains("===== Skipped (by user choice) =====\necho two\n"))
        .stdout(contains("# [UNHANDLED]\necho three\n# [/UNHANDLED]"));

    let out = env.written();
    assert!(out.contains("# User-Migrated\n# [USER-MIGRATED]\necho fish one\n# [USER-MIGRATED]\necho two\n"));
    assert!(!out.contains("echo three"));
}

#[test]
fn closed_stdin_skips() {
    let env = Env::new("echo one\n");
    env.migrate()
        .write_stdin("")
        .assert()
        .success()
        .stdout(contains("===== Skipped (by user choice) =====\necho one\n"));
}

#[test]
fn skip_policy_never_asks() {
    let env = Env::new("echo one\nif true; then\n  setopt x\nfi\n");
    env.migrate()
        .args(["--on-ambiguous", "skip"])
        .assert()
        .success()
        .stdout(contains("What do you want to do?").not())
        .stdout(contains("echo one"));
}

#[test]
fn comment_policy_reports_unhandled() {
    let env = Env::new("echo one\nplugins=(git)\n");
    env.migrate()
        .args(["--on-ambiguous", "comment"])
        .assert()
        .success()
        .stdout(contains("===== Unhandled or Zsh-only lines ====="))
        .stdout(contains("# [UNHANDLED]\necho one\n# [/UNHANDLED]"))
        .stdout(contains("plugins=(git)"));
}

#[test]
fn existing_output_is_backed_up() {
    let env = Env::new("export A=1\n");
    fs::create_dir_all(env.output().parent().unwrap()).unwrap();
    fs::write(env.output(), "old").unwrap();
    fs::write(env.dir.path().join("fish/config.fish.bak"), "older").unwrap();

    env.migrate()
        .assert()
        .success()
        .stdout(contains("Backup created:"))
        .stdout(contains("config.fish.bak.1"));
    assert_eq!(
        fs::read_to_string(env.dir.path().join("fish/config.fish.bak.1")).unwrap(),
        "old"
    );
}

#[test]
fn no_backup_flag() {
    let env = Env::new("export A=1\n");
    fs::create_dir_all(env.output().parent().unwrap()).unwrap();
    fs::write(env.output(), "old").unwrap();

    env.migrate().arg("--no-backup").assert().success();
    assert!(!env.dir.path().join("fish/config.fish.bak").exists());
    assert!(env.written().contains("set -gx A 1"));
}

#[test]
fn default_paths_follow_home_and_xdg() {
    let env = Env::new("alias g=git\n");
    let xdg = env.dir.path().join("xdg");
    env.cmd()
        .env("XDG_CONFIG_HOME", &xdg)
        .assert()
        .success();
    let out = fs::read_to_string(xdg.join("fish/config.fish")).unwrap();
    assert!(out.contains("alias g=git"));
}

#[test]
fn default_output_without_xdg() {
    let env = Env::new("alias g=git\n");
    env.cmd().assert().success();
    assert!(env.dir.path().join(".config/fish/config.fish").exists());
}

#[test]
fn tilde_paths_expand_to_home() {
    let env = Env::new("alias g=git\n");
    env.cmd()
        .args(["-i", "~/.zshrc", "-o", "~/out/config.fish"])
        .assert()
        .success();
    assert!(env.dir.path().join("out/config.fish").exists());
}

#[test]
fn dry_run_prints_without_writing() {
    let env = Env::new("export A='x y'\n");
    env.migrate()
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(contains("set -gx A \"x y\""));
    assert!(!env.output().exists());
}

#[test]
fn missing_input_fails() {
    let env = Env::new("");
    env.cmd()
        .args(["--input", "/definitely/not/here/.zshrc"])
        .arg("--output")
        .arg(env.output())
        .assert()
        .failure()
        .code(1)
        .stderr(contains("zsh2fish:"))
        .stderr(contains("cannot read /definitely/not/here/.zshrc"));
    assert!(!env.output().exists());
}
