fn main() {
    kaleido::projects::cli::start_cli();
}
