use clap::Parser;
use docker_registry_creds::OutputManager;
use docker_registry_creds::cli::{Args, run};

fn main() {
    let args = Args::parse();
    let output = if args.quiet {
        OutputManager::new_quiet()
    } else {
        OutputManager::new(args.verbose)
    };

    match run(&args, &output) {
        Ok(commands) => {
            for command in &commands {
                println!("{}", command);
            }
            output.verbose(&format!("Rendered {} install commands", commands.len()));
        }
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    }
}
