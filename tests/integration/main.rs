//! Integration tests for mathrender

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn mathrender() -> Command {
        let mut cmd = cargo_bin_cmd!("mathrender");
        cmd.env_remove("MATHRENDER_CONFIG").env_remove("RUST_LOG");
        cmd
    }

    /// Write a config pointing the engine at `binary`
    fn write_config(dir: &Path, binary: &str) -> PathBuf {
        let path = dir.join("config.toml");
        let content = format!(
            "[engine]\nbackend = \"installed\"\nbinary = \"{}\"\ntimeout_secs = 5\n",
            binary
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Stand-in for the KaTeX CLI: answers --version and wraps stdin
    #[cfg(unix)]
    fn fake_katex(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("katex");
        let script = r#"#!/bin/sh
mode=inline
for arg in "$@"; do
  [ "$arg" = "--version" ] && { echo "0.16.9"; exit 0; }
  [ "$arg" = "--display-mode" ] && mode=display
done
printf '<span class="katex %s">%s</span>' "$mode" "$(cat)"
"#;
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        mathrender()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cached KaTeX rendering"));
    }

    #[test]
    fn version_displays() {
        mathrender()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("mathrender"));
    }

    #[test]
    fn text_mode_is_verbatim() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "/nonexistent/katex");

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["render", "--mode", "text", "a $b$ & <c>"])
            .assert()
            .success()
            .stdout("a $b$ & <c>\n");
    }

    #[test]
    fn missing_engine_falls_back_to_source() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "/nonexistent/katex");

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["render", "Area is $x^2$."])
            .assert()
            .success()
            .stdout(predicate::str::contains("Area is "))
            .stdout(predicate::str::contains("math-fallback"))
            .stdout(predicate::str::contains("x^2"));
    }

    #[cfg(unix)]
    #[test]
    fn mixed_content_renders_through_engine() {
        let temp = TempDir::new().unwrap();
        let katex = fake_katex(temp.path());
        let config = write_config(temp.path(), katex.to_str().unwrap());

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["render", "half is $\\frac{1}{2}$ and $$x$$ end"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "half is <span class=\"katex inline\">\\frac{1}{2}</span> and ",
            ))
            .stdout(predicate::str::contains(
                "<span class=\"katex display\">x</span> end",
            ));
    }

    #[cfg(unix)]
    #[test]
    fn bare_environment_renders_as_display_math() {
        let temp = TempDir::new().unwrap();
        let katex = fake_katex(temp.path());
        let config = write_config(temp.path(), katex.to_str().unwrap());

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["render", "--inline", "\\begin{align} a &= b \\end{align}"])
            .assert()
            .success()
            .stdout(predicate::str::contains("katex display"))
            .stdout(predicate::str::contains("\\begin{aligned}"));
    }

    #[cfg(unix)]
    #[test]
    fn json_output_carries_metadata() {
        let temp = TempDir::new().unwrap();
        let katex = fake_katex(temp.path());
        let config = write_config(temp.path(), katex.to_str().unwrap());

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["render", "--output", "json", "--mode", "math", "x"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"kind\": \"formula\""))
            .stdout(predicate::str::contains("\"error\": false"));
    }

    #[cfg(unix)]
    #[test]
    fn warmup_reports_json() {
        let temp = TempDir::new().unwrap();
        let katex = fake_katex(temp.path());
        let config = write_config(temp.path(), katex.to_str().unwrap());
        let formulas = temp.path().join("formulas.tex");
        std::fs::write(&formulas, "x^2\n\n% comment\nx^2\n\\frac{1}{2}\n").unwrap();

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["warmup", "--json", formulas.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"rendered\": 2"))
            .stdout(predicate::str::contains("\"cached\": 1"));
    }

    #[test]
    fn standalone_links_pinned_stylesheet() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "/nonexistent/katex");

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["render", "--mode", "text", "--standalone", "hello"])
            .assert()
            .success()
            .stdout(predicate::str::contains("<!DOCTYPE html>"))
            .stdout(predicate::str::contains("katex@0.16.9/dist/katex.min.css"));
    }

    #[test]
    fn empty_stdin_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "/nonexistent/katex");

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .arg("render")
            .write_stdin("")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Nothing to render"));
    }

    #[test]
    fn status_reports_missing_engine() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "/nonexistent/katex");

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("KaTeX unavailable"));
    }

    #[test]
    fn config_path() {
        mathrender()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "katex");

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[engine]"))
            .stdout(predicate::str::contains("[cache]"));
    }

    #[test]
    fn config_set_then_show() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("nested").join("config.toml");

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["config", "set", "cache.max_size", "42"])
            .assert()
            .success();

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("max_size = 42"));
    }

    #[test]
    fn invalid_config_reports_path() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        std::fs::write(&config, "[cache\nmax_size = ").unwrap();

        mathrender()
            .args(["--config", config.to_str().unwrap()])
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("config.toml"));
    }

    #[test]
    fn completions_bash() {
        mathrender()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("mathrender"));
    }
}
