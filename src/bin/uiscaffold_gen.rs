fn main() -> anyhow::Result<()> {
    uiscaffold::cli::run_cli()
}
