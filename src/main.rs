fn main() {
    #[cfg(feature = "cli")]
    bsdiffhs::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("bsdiffhs: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
