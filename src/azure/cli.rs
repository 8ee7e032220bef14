//! Azure CLI command execution.
//!
//! Provides utilities for running Azure CLI commands and parsing their output.

use colored::Colorize;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

/// Flags whose value must never reach the log.
const SECRET_FLAGS: [&str; 3] = ["--password", "-p", "--public-cert-data"];

/// Largest stdout accepted from a single command.
const MAX_STDOUT_BYTES: usize = 500_000;

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Something that can run a command line and hand back its stdout.
///
/// [`AzCli`] spawns real processes; tests substitute a recorder.
pub trait CommandRunner {
    fn run(&self, args: &[String]) -> Result<String, Box<dyn Error>>;

    /// Run a command with `input` written to its stdin.
    fn run_with_input(&self, args: &[String], input: &str) -> Result<String, Box<dyn Error>>;

    /// Run a command line given as one string.
    ///
    /// The string is split on spaces, with quoted substrings preserved.
    fn run_line(&self, cmd: &str) -> Result<String, Box<dyn Error>> {
        self.run(&split_command(cmd))
    }
}

/// Runs commands through the local `az` installation.
#[derive(Debug, Default, Clone, Copy)]
pub struct AzCli;

impl CommandRunner for AzCli {
    fn run(&self, args: &[String]) -> Result<String, Box<dyn Error>> {
        run_args(args)
    }

    fn run_with_input(&self, args: &[String], input: &str) -> Result<String, Box<dyn Error>> {
        run_args_with_input(args, input)
    }
}

/// Split a command line into owned args, dropping empty pieces.
pub fn split_command(cmd: &str) -> Vec<String> {
    split_and_strip(cmd)
        .into_iter()
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect()
}

/// Run a pre-split command and return its stdout.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err` - If the command fails, is empty or produces too much output
pub fn run_args(args: &[String]) -> Result<String, Box<dyn Error>> {
    execute(args, None)
}

/// Like [`run_args`], feeding `input` to the command's stdin.
///
/// Keeps values such as secrets out of the process list.
pub fn run_args_with_input(args: &[String], input: &str) -> Result<String, Box<dyn Error>> {
    execute(args, Some(input))
}

fn output_with_stdin(mut command: Command, input: &str) -> std::io::Result<Output> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }
    child.wait_with_output()
}

fn execute(args: &[String], input: Option<&str>) -> Result<String, Box<dyn Error>> {
    let (program, rest) = args.split_first().ok_or("Empty command")?;
    let shown = redact(args).join(" ");
    log::debug!("run({cmd})", cmd = shown.on_blue());

    let mut command = Command::new(program);
    command.args(rest);
    let output = match input {
        Some(input) => output_with_stdin(command, input),
        None => command.output(),
    }
    .map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("Failed to execute {program}: {e}")
    })?;

    if output.status.success() {
        log::debug!("Success cmd: {shown}");
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());

        if output.stdout.len() > MAX_STDOUT_BYTES {
            return Err(format!(
                "Response too large: {} bytes for command: {shown}",
                output.stdout.len()
            )
            .into());
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = shown.on_blue()
        );
        return Err(format!("ERROR running: {shown}: {}", stderr.trim()).into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;

    Ok(stdout)
}

/// Copy of `args` with the value after every secret flag masked.
pub fn redact(args: &[String]) -> Vec<String> {
    let mut hide_next = false;
    args.iter()
        .map(|a| {
            if hide_next {
                hide_next = false;
                return "***".to_string();
            }
            hide_next = SECRET_FLAGS.contains(&a.as_str());
            a.clone()
        })
        .collect()
}

/// Decode CLI JSON output; the error names the failing JSON path.
pub fn parse_json<T: DeserializeOwned>(output: &str, what: &str) -> Result<T, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        format!("Error parsing {what}: path={} error={}", e.path(), e).into()
    })
}

/// Decode CLI JSON output that may be wrapped as `{"<envelope>": {...}}`.
///
/// `az ... create` wraps some objects (`newVNet`, `publicIp`, `vnetGateway`)
/// while `update`/`show` return them bare.
pub fn parse_enveloped<T: DeserializeOwned>(
    output: &str,
    envelope: &str,
    what: &str,
) -> Result<T, Box<dyn Error>> {
    let value: serde_json::Value = parse_json(output, what)?;
    let inner = match value {
        serde_json::Value::Object(mut map) if map.len() == 1 && map.contains_key(envelope) => {
            map.remove(envelope).unwrap_or_default()
        }
        other => other,
    };
    serde_path_to_error::deserialize(inner)
        .map_err(|e| format!("Error parsing {what}: path={} error={}", e.path(), e).into())
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_split_and_strip_complex() {
        let input = "Hello 'World War'  'fail' Rust";
        let expected = vec!["Hello", "World War", "fail", "Rust"];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_split_and_strip_empty_quotes() {
        let input = "Empty '' Single Quotes";
        let expected = vec!["Empty", "", "Single", "Quotes"];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_split_tags() {
        let input = "az network vnet-gateway create --tags key=value --name 'gw 1'";
        assert_eq!(
            split_and_strip(input),
            vec!["az", "network", "vnet-gateway", "create", "--tags", "key=value", "--name", "gw 1"]
        );
    }

    #[test]
    fn test_split_command_drops_empty() {
        assert_eq!(
            split_command("az group delete --name rg1  --yes"),
            strings(&["az", "group", "delete", "--name", "rg1", "--yes"])
        );
    }

    #[test]
    fn test_redact() {
        let args = strings(&["az", "login", "--password", "s3cr3t", "--tenant", "t"]);
        assert_eq!(
            redact(&args),
            strings(&["az", "login", "--password", "***", "--tenant", "t"])
        );
        let args = strings(&["az", "x", "--public-cert-data", "MIIC", "-p"]);
        assert_eq!(redact(&args), strings(&["az", "x", "--public-cert-data", "***", "-p"]));
    }

    #[test]
    fn test_run_args_empty() {
        assert_eq!(run_args(&[]).unwrap_err().to_string(), "Empty command");
        assert_eq!(
            run_args_with_input(&[], "x").unwrap_err().to_string(),
            "Empty command"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_run_args_with_input_feeds_stdin() {
        let out = run_args_with_input(&strings(&["cat"]), "s3cr3t").unwrap();
        assert_eq!(out, "s3cr3t");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_args_reports_stderr() {
        let err = run_args(&strings(&["sh", "-c", "echo boom >&2; exit 3"]))
            .unwrap_err()
            .to_string();
        assert_eq!(err, "ERROR running: sh -c echo boom >&2; exit 3: boom");
    }

    #[derive(Deserialize, Debug)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_parse_json_reports_path() {
        let err = parse_json::<Vec<Named>>(r#"[{"name": "a"}, {"name": 5}]"#, "names")
            .unwrap_err()
            .to_string();
        assert!(err.starts_with("Error parsing names: path=[1].name"), "{err}");
    }

    #[test]
    fn test_parse_enveloped() {
        let wrapped: Named =
            parse_enveloped(r#"{"publicIp": {"name": "pip1"}}"#, "publicIp", "pip").unwrap();
        assert_eq!(wrapped.name, "pip1");
        let bare: Named = parse_enveloped(r#"{"name": "pip2"}"#, "publicIp", "pip").unwrap();
        assert_eq!(bare.name, "pip2");
    }
}
