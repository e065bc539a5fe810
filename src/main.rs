fn main() {
    if let Err(e) = pagepilot_lib::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
