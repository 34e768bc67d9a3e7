//! Command-line options.
//!
//! Long options are accepted with one dash as well as two
//! (`-sceneFile scene.txt`). Bad options never abort the program: usage is
//! printed and rendering continues with the default options.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

const LONG_OPTIONS: [&str; 4] = ["sceneFile", "outputFile", "display", "help"];

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "glint", version, about = "Render a scene to a PNG image", disable_help_flag = true)]
pub struct Options {
    /// Scene file to render (the built-in demo scene if omitted)
    #[arg(short = 's', long = "sceneFile", value_name = "PATH")]
    pub scene_file: Option<PathBuf>,

    /// Where to write the rendered image
    #[arg(short = 'o', long = "outputFile", value_name = "PATH", default_value = "render.png")]
    pub output_file: PathBuf,

    /// Show the render in a window while it runs
    #[arg(
        short = 'd',
        long = "display",
        value_name = "T|F",
        default_value = "F",
        action = ArgAction::Set,
        value_parser = parse_switch
    )]
    pub display: bool,

    /// Print usage
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scene_file: None,
            output_file: PathBuf::from("render.png"),
            display: false,
            help: false,
        }
    }
}

/// Parse command-line arguments, printing usage on `-h` or on errors.
pub fn parse<I, T>(args: I) -> Options
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    match Options::try_parse_from(normalize(args)) {
        Ok(options) => {
            if options.help {
                println!("{}", usage());
            }
            options
        }
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("{}", usage());
            log::warn!("Ignoring invalid arguments, continuing with defaults");
            Options::default()
        }
    }
}

fn usage() -> String {
    Options::command().render_help().to_string()
}

/// Rewrite `-sceneFile` style options to `--sceneFile`.
fn normalize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let long_name = arg
                .to_str()
                .and_then(|text| text.strip_prefix('-'))
                .filter(|rest| !rest.starts_with('-'))
                .map(|rest| rest.split('=').next().unwrap_or(rest));

            match long_name {
                Some(name) if LONG_OPTIONS.contains(&name) => {
                    let mut long = OsString::from("-");
                    long.push(&arg);
                    long
                }
                _ => arg,
            }
        })
        .collect()
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value {
        "T" | "t" | "true" => Ok(true),
        "F" | "f" | "false" => Ok(false),
        _ => Err(format!("expected T or F, found `{}`", value)),
    }
}
