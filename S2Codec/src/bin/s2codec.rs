//! `s2codec` command-line binary

fn main() -> anyhow::Result<()> {
    s2codec::cli::run_cli()
}
