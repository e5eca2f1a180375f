// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: configuration file
fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("PATH")
        .global(true)
        .help("Configuration file (default: /etc/repoinit-sysusers/config.toml)")
}

fn build_cli() -> Command {
    Command::new("repoinit-sysusers")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert content package system users into a repoinit script")
        .arg(config_arg())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("convert")
                .about("Convert the system users of unpacked content packages")
                .arg(
                    Arg::new("packages")
                        .required(true)
                        .num_args(1..)
                        .help("Package directories (each holding jcr_root/), processed in order"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Write the script to a file instead of stdout"),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_parser(["text", "json"])
                        .default_value("text")
                        .help("Output format"),
                ),
        )
        .subcommand(
            Command::new("classify")
                .about("Show how package paths are classified")
                .arg(Arg::new("paths").required(true).num_args(1..).help("Package-relative paths")),
        )
        .subcommand(
            Command::new("decode")
                .about("Decode platform names into repository names")
                .arg(Arg::new("segments").required(true).num_args(1..)),
        )
        .subcommand(
            Command::new("encode")
                .about("Encode repository names into platform names")
                .arg(Arg::new("names").required(true).num_args(1..)),
        )
        .subcommand(
            Command::new("check")
                .about("Check that a script file parses")
                .arg(Arg::new("script").required(true).help("Script file")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Man page lands in OUT_DIR/man
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = out_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("repoinit-sysusers.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
