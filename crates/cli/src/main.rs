fn main() {
    if let Err(e) = docscope_cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
