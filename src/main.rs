fn main() {
    // Delegate to CLI runner; usage errors exit from inside.
    if let Err(err) = gitloc::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
