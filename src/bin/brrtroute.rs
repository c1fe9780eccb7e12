fn main() -> anyhow::Result<()> {
    brrtroute::cli::run_cli()
}
