fn main() {
    #[cfg(feature = "cli")]
    diffscan::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("diffscan: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
