//! Command-line argument parsing
//!
//! Supports:
//! - Checking files for heuristic problems (text or JSON)
//! - Dumping the token stream of a file
//! - Printing a file with colors and error tints
//! - Re-checking a file whenever it changes on disk
//! - Writing the default config and palettes for editing

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use loupe::config::ScanConfig;
use loupe::diagnostics::IndentStyle;
use loupe::palette::ThemeKind;

/// Language-agnostic token coloring and error spotting
#[derive(Parser, Debug)]
#[command(name = "loupe", version, about = "Good-enough code awareness for any language")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report heuristic problems in files
    Check {
        /// Files to check
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        detector: DetectorArgs,
    },

    /// Print the token stream of a file
    Tokens {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print a file with token colors and error highlights
    Show {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        display: DisplayArgs,

        #[command(flatten)]
        detector: DetectorArgs,
    },

    /// Re-check a file every time it changes
    Watch {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        display: DisplayArgs,

        #[command(flatten)]
        detector: DetectorArgs,
    },

    /// Print config, palette and log locations
    Paths,

    /// Write the default config file to the config directory
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Write the built-in palettes to the config directory for editing
    InitPalettes {
        /// Overwrite existing palette files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct DetectorArgs {
    /// Expected indentation: auto, tabs, spaces or spaces:N
    #[arg(long, value_name = "STYLE")]
    pub indent: Option<IndentStyle>,

    /// Skip the missing-terminator heuristic
    #[arg(long)]
    pub no_terminators: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DisplayArgs {
    /// Palette to render with (defaults to the configured theme)
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for ThemeKind {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => ThemeKind::Dark,
            ThemeArg::Light => ThemeKind::Light,
        }
    }
}

impl DetectorArgs {
    /// Command-line flags take precedence over the config file
    pub fn apply_to(&self, config: &mut ScanConfig) {
        if let Some(style) = self.indent {
            config.indent_style = style;
        }
        if self.no_terminators {
            config.check_terminators = false;
        }
    }
}

impl DisplayArgs {
    pub fn apply_to(&self, config: &mut ScanConfig) {
        if let Some(theme) = self.theme {
            config.theme = theme.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_check_with_options() {
        let cli = parse(&[
            "loupe",
            "check",
            "a.js",
            "b.js",
            "--format",
            "json",
            "--indent",
            "spaces:2",
            "--no-terminators",
        ]);
        let Command::Check {
            paths,
            format,
            detector,
        } = cli.command
        else {
            panic!("Expected check command");
        };
        assert_eq!(paths.len(), 2);
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(detector.indent, Some(IndentStyle::Spaces(2)));
        assert!(detector.no_terminators);
    }

    #[test]
    fn test_init_config_force_flag() {
        let Command::InitConfig { force } = parse(&["loupe", "init-config", "--force"]).command
        else {
            panic!("Expected init-config command");
        };
        assert!(force);
        assert!(matches!(
            parse(&["loupe", "init-config"]).command,
            Command::InitConfig { force: false }
        ));
    }

    #[test]
    fn test_check_requires_paths() {
        assert!(Cli::try_parse_from(["loupe", "check"]).is_err());
    }

    #[test]
    fn test_invalid_indent_is_rejected() {
        assert!(Cli::try_parse_from(["loupe", "check", "a", "--indent", "wide"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = ScanConfig::default();
        DetectorArgs {
            indent: Some(IndentStyle::Tabs),
            no_terminators: true,
        }
        .apply_to(&mut config);
        DisplayArgs {
            theme: Some(ThemeArg::Light),
        }
        .apply_to(&mut config);

        assert_eq!(config.indent_style, IndentStyle::Tabs);
        assert!(!config.check_terminators);
        assert_eq!(config.theme, ThemeKind::Light);
    }

    #[test]
    fn test_defaults_leave_config_alone() {
        let mut config = ScanConfig::default();
        DetectorArgs::default().apply_to(&mut config);
        DisplayArgs::default().apply_to(&mut config);
        assert_eq!(config, ScanConfig::default());
    }
}
