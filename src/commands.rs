use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::actions::parse_response;
use crate::config::AppConfig;
use crate::errors::PilotResult;
use crate::targeting::scripts::{count_elements_script, describe_element_script};
use crate::targeting::xpath_to_css;

#[derive(Debug, Parser)]
#[command(name = "pagepilot", version, about = "Interpret model-written browser actions")]
pub struct Cli {
    /// Path to config.toml (otherwise searched next to the binary, in the working
    /// directory, then in the user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse model output into a validated action list, printed as JSON.
    Parse {
        /// File holding the model output; reads stdin when omitted.
        file: Option<PathBuf>,
    },
    /// Translate an XPath expression into a CSS selector.
    Css {
        xpath: String,
        /// Wrap the selector in a page script instead of printing it bare.
        #[arg(long, value_enum)]
        script: Option<ScriptKind>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScriptKind {
    /// Count matching elements (stability measurement).
    Count,
    /// Describe the first match for the interactivity/visibility checks.
    Describe,
}

pub fn dispatch(command: Command, config: &AppConfig) -> PilotResult<()> {
    match command {
        Command::Parse { file } => {
            let text = read_input(file)?;
            let actions = parse_response(&text)?;
            tracing::info!(count = actions.len(), "parsed model output");
            println!("{}", serde_json::to_string_pretty(&actions)?);
        }
        Command::Css { xpath, script } => {
            let css = xpath_to_css(&xpath);
            tracing::debug!(xpath = %xpath, css = %css, "translated selector");
            let out = match script {
                None => css,
                Some(ScriptKind::Count) => count_elements_script(&css),
                Some(ScriptKind::Describe) => describe_element_script(&css),
            };
            println!("{out}");
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}

fn read_input(file: Option<PathBuf>) -> PilotResult<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
