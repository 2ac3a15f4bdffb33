use brainrotc::{Options, cli};
use std::env;
use std::path::Path;
use std::process;

fn main() {
  let args: Vec<String> = env::args().collect();
  if args.len() != 3 {
    let program = args.first().map(String::as_str).unwrap_or("brainrotc");
    eprintln!("usage: {program} <source-path> <output-path>");
    process::exit(1);
  }

  let options = Options::default();
  if let Err(err) = cli::run(Path::new(&args[1]), Path::new(&args[2]), &options) {
    eprintln!("{err}");
    process::exit(1);
  }
}
