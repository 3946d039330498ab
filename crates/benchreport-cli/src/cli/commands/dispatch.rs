use crate::cli::args::{Cli, Command};

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Report(args) => super::report::run(args),
        Command::Merge(args) => super::merge::run(args),
    }
}
