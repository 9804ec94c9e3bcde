mod cli;
mod rlpl;
mod rppl;

use std::path::PathBuf;

use atto_core::interpreter::Interpreter;
use clap::Parser;

#[derive(Parser)]
enum Command {
    /// Parses and runs an atto script
    Run {
        /// Path of the script, `-` reads from stdin
        path: PathBuf,
        /// Do not merge the corelib aliases into the function table
        #[arg(long, default_value_t = false)]
        no_corelib: bool,
        /// Print status and timing lines to stderr
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl
}

fn main() {
    ctrlc::set_handler(|| std::process::exit(130))
        .expect("install interrupt handler");

    match Command::parse() {
        Command::Run { path, no_corelib, verbose } => {
            let interpreter = if no_corelib {
                Interpreter::without_corelib()
            } else {
                Interpreter::new()
            };

            let buf_writer = cli::stderr_buffer_writer();
            let mut buf = buf_writer.buffer();

            if verbose {
                cli::print_running(&path.to_string_lossy());
            }
            let start = std::time::Instant::now();

            let result = if path.as_os_str() == "-" {
                interpreter.run_reader(PathBuf::from("<stdin>"), std::io::stdin().lock())
            } else {
                interpreter.run_file(&path)
            };

            let code = match result {
                Ok(code) => code,
                Err(err) => {
                    err.pretty(&mut buf);
                    buf_writer
                        .print(&buf)
                        .expect("Writing error to stderr");

                    std::process::exit(1);
                }
            };

            if verbose {
                cli::print_finished(std::time::Instant::now() - start);
            }

            std::process::exit(code);
        },
        Command::Rlpl => {
            let _ = rlpl::start();
        },
        Command::Rppl => {
            let _ = rppl::start();
        }
    }
}
