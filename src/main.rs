fn main() {
    if let Err(e) = gost89::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
