#![forbid(unsafe_code)]

//! BugScope demo binary entry point.

use std::io;
use std::process;
use std::time::Duration;

use bugscope_core::Catalog;
use bugscope_demo::app::{Action, App};
use bugscope_demo::{cli, headless, interactive, logging};

fn main() {
    let opts = cli::Opts::parse();
    logging::init(opts.log_json);

    let catalog = match load_catalog(&opts) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load scenarios: {e}");
            process::exit(1);
        }
    };

    if opts.list {
        for sc in catalog.iter() {
            println!("{:<16} {:<18} {}", sc.id, sc.category, sc.title);
        }
        return;
    }

    let mut app = App::new(catalog);
    match &opts.scenario {
        Some(id) => {
            if let Err(e) = app.select(id) {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        None => app.select_first(),
    }

    let frame = Duration::from_millis(opts.frame_ms);
    let exit_after = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));

    let result = if opts.headless {
        headless::run(&mut app, frame, exit_after, &mut io::stdout().lock())
    } else {
        if opts.autorun {
            app.apply(Action::Run);
        }
        interactive::run(&mut app, frame, exit_after)
    };
    if let Err(e) = result {
        eprintln!("Runtime error: {e}");
        process::exit(1);
    }
}

fn load_catalog(opts: &cli::Opts) -> Result<Catalog, bugscope_scenarios::LoadError> {
    match &opts.catalog {
        Some(path) => bugscope_scenarios::load(path),
        None => bugscope_scenarios::bundled(),
    }
}
