#![forbid(unsafe_code)]

//! Command-line argument parsing for the BugScope demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable defaults via the `BUGSCOPE_DEMO_*` prefix; explicit flags win.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
BugScope: guided bug walkthroughs in the terminal

USAGE:
    bugscope [OPTIONS]

OPTIONS:
    --scenario=ID        Start with scenario ID selected (default: first)
    --catalog=PATH       Load scenarios from a JSON catalog file
    --list               List the catalog's scenarios and exit
    --autorun            Start the run immediately
    --headless           Run and print playback events to stdout instead of drawing
    --frame-ms=N         Redraw and input poll interval in ms (default: 16)
    --exit-after-ms=N    Quit after N milliseconds (0 = never)
    --log-json           Emit logs on stderr as JSON
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Enter / r / Space    Run the selected scenario
    Esc / x              Reset playback
    j / Down             Next scenario
    k / Up               Previous scenario
    PageUp / PageDown    Scroll the page
    [ / ]                Scroll the trace panel
    q / Ctrl+C           Quit

ENVIRONMENT VARIABLES:
    BUGSCOPE_DEMO_SCENARIO       Default for --scenario
    BUGSCOPE_DEMO_CATALOG        Default for --catalog
    BUGSCOPE_DEMO_FRAME_MS       Default for --frame-ms
    BUGSCOPE_DEMO_EXIT_AFTER_MS  Default for --exit-after-ms
    BUGSCOPE_LOG                 Log filter directives (default: warn)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Scenario to select at startup.
    pub scenario: Option<String>,
    /// Catalog file to load instead of the bundled one.
    pub catalog: Option<PathBuf>,
    pub list: bool,
    pub autorun: bool,
    pub headless: bool,
    /// Redraw and poll interval.
    pub frame_ms: u64,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
    pub log_json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            scenario: None,
            catalog: None,
            list: false,
            autorun: false,
            headless: false,
            frame_ms: 16,
            exit_after_ms: 0,
            log_json: false,
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or a bad argument.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("bugscope {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` on top of defaults read through `var`.
    pub fn parse_from<I, F>(args: I, var: F) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = var("BUGSCOPE_DEMO_SCENARIO") {
            opts.scenario = Some(val);
        }
        if let Some(val) = var("BUGSCOPE_DEMO_CATALOG") {
            opts.catalog = Some(PathBuf::from(val));
        }
        if let Some(val) = var("BUGSCOPE_DEMO_FRAME_MS")
            && let Ok(n) = val.parse()
        {
            opts.frame_ms = n;
        }
        if let Some(val) = var("BUGSCOPE_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--list" => opts.list = true,
                "--autorun" => opts.autorun = true,
                "--headless" => opts.headless = true,
                "--log-json" => opts.log_json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--scenario=") {
                        opts.scenario = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--catalog=") {
                        opts.catalog = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--frame-ms=") {
                        opts.frame_ms = parse_ms("--frame-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_ms("--exit-after-ms", val)?;
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        opts.frame_ms = opts.frame_ms.max(1);
        Ok(Command::Run(opts))
    }
}

fn parse_ms(flag: &str, val: &str) -> Result<u64, String> {
    val.parse().map_err(|_| format!("Invalid {flag} value: {val}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        Opts::parse_from(args.iter().map(|s| s.to_string()), |_| None)
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.frame_ms, 16);
        assert_eq!(opts.exit_after_ms, 0);
        assert!(opts.scenario.is_none());
        assert!(!opts.headless);
    }

    #[test]
    fn flags_are_parsed() {
        let cmd = parse(&[
            "--scenario=null-async",
            "--autorun",
            "--headless",
            "--frame-ms=5",
            "--catalog=/tmp/c.json",
        ])
        .unwrap();
        let Command::Run(opts) = cmd else {
            panic!("expected run");
        };
        assert_eq!(opts.scenario.as_deref(), Some("null-async"));
        assert!(opts.autorun && opts.headless);
        assert_eq!(opts.frame_ms, 5);
        assert_eq!(opts.catalog, Some(PathBuf::from("/tmp/c.json")));
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            "BUGSCOPE_DEMO_SCENARIO" => Some("scope-leak".to_string()),
            "BUGSCOPE_DEMO_FRAME_MS" => Some("40".to_string()),
            "BUGSCOPE_DEMO_EXIT_AFTER_MS" => Some("junk".to_string()),
            _ => None,
        };
        let Ok(Command::Run(opts)) =
            Opts::parse_from(vec!["--scenario=off-by-one".to_string()], env)
        else {
            panic!("expected run");
        };
        assert_eq!(opts.scenario.as_deref(), Some("off-by-one"));
        assert_eq!(opts.frame_ms, 40);
        assert_eq!(opts.exit_after_ms, 0);
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["--autorun", "-h"]), Ok(Command::Help));
        assert_eq!(parse(&["--version"]), Ok(Command::Version));
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert_eq!(
            parse(&["--frame-ms=fast"]),
            Err("Invalid --frame-ms value: fast".to_string())
        );
        assert_eq!(
            parse(&["--bogus"]),
            Err("Unknown argument: --bogus".to_string())
        );
    }

    #[test]
    fn zero_frame_interval_is_clamped() {
        let Ok(Command::Run(opts)) = parse(&["--frame-ms=0"]) else {
            panic!("expected run");
        };
        assert_eq!(opts.frame_ms, 1);
    }

    #[test]
    fn help_text_lists_keys_and_env() {
        assert!(HELP_TEXT.contains("--headless"));
        assert!(HELP_TEXT.contains("BUGSCOPE_DEMO_SCENARIO"));
        assert!(HELP_TEXT.contains("q / Ctrl+C"));
        assert!(!VERSION.is_empty());
    }
}
